//! Cart Store
//!
//! Session-scoped shopping cart. The browser holds this state between
//! requests and replays it at checkout; the server treats it as an
//! opaque value object handed to the price calculator at commit time.
//! Single-session by contract, so no locking.
//!
//! Entries merge by identity tuple (product-or-custom, size, color):
//! adding an item that matches an existing entry increments its quantity
//! instead of appending a duplicate. Unit prices are snapshotted at
//! add-time and honored as the shopper saw them.

use serde::{Deserialize, Serialize};
use shared::models::{ItemIdentity, LineItem};

/// Ordered collection of line items. Insertion order is irrelevant to
/// pricing but preserved for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, merging by identity tuple. A merge keeps the
    /// existing entry's snapshot price; only the quantity accumulates.
    pub fn add(&mut self, item: LineItem) {
        let identity = item.identity();
        if let Some(existing) = self.items.iter_mut().find(|i| i.identity() == identity) {
            existing.quantity += item.quantity;
        } else {
            self.items.push(item);
        }
    }

    /// Set the quantity of an entry; n <= 0 removes it. Unknown
    /// identities are ignored.
    pub fn set_quantity(&mut self, identity: &ItemIdentity, quantity: i64) {
        if quantity <= 0 {
            self.remove(identity);
            return;
        }
        if let Some(existing) = self.items.iter_mut().find(|i| &i.identity() == identity) {
            existing.quantity = quantity;
        }
    }

    pub fn remove(&mut self, identity: &ItemIdentity) {
        self.items.retain(|i| &i.identity() != identity);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Subtotal in minor currency units
    pub fn subtotal(&self) -> i64 {
        self.items.iter().map(LineItem::line_total).sum()
    }
}
