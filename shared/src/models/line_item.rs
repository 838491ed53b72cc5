//! Line Item Model
//!
//! A line item is one (product-or-custom, size, color, quantity, price)
//! entry in a cart or order. Custom-designed items carry no catalog
//! product; they reference uploaded design assets instead.

use serde::{Deserialize, Serialize};

/// Reserved product id for custom-designed items at the storage boundary.
/// Catalog product ids are snowflake-generated and never collide with it.
pub const CUSTOM_PRODUCT_ID: i64 = 0;

/// What a line item points at: a catalog product, or a custom design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ItemRef {
    Catalog(i64),
    Custom,
}

impl ItemRef {
    /// Value stored in the `product_id` column.
    pub fn product_id_column(&self) -> i64 {
        match self {
            ItemRef::Catalog(id) => *id,
            ItemRef::Custom => CUSTOM_PRODUCT_ID,
        }
    }

    /// Reverse of [`product_id_column`](Self::product_id_column).
    pub fn from_product_id(product_id: i64) -> Self {
        if product_id == CUSTOM_PRODUCT_ID {
            ItemRef::Custom
        } else {
            ItemRef::Catalog(product_id)
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ItemRef::Custom)
    }
}

/// User-supplied design payload carried by custom line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomPayload {
    /// References to uploaded design assets. An order-bound custom item
    /// must carry at least one.
    #[serde(default)]
    pub image_refs: Vec<String>,
    /// Freeform text to print on the item
    pub text: Option<String>,
    /// Arbitrary option bag (scale factor, placement coordinates, ...)
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// Identity tuple for cart merge semantics: two line items with the same
/// identity are the same cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemIdentity {
    pub item: ItemRef,
    pub size: String,
    pub color: String,
}

/// One cart/order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub item: ItemRef,
    pub size: String,
    pub color: String,
    /// Unit price in minor currency units, snapshotted at add-time.
    /// The shopper pays the price they saw; it is not re-fetched later.
    pub unit_price: i64,
    pub quantity: i64,
    pub custom: Option<CustomPayload>,
}

impl LineItem {
    pub fn identity(&self) -> ItemIdentity {
        ItemIdentity {
            item: self.item,
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    /// Line total in minor currency units
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity
    }

    /// A custom item is orderable only with at least one design asset
    pub fn has_design_asset(&self) -> bool {
        self.custom
            .as_ref()
            .map(|c| !c.image_refs.is_empty())
            .unwrap_or(false)
    }
}
