//! Order Model
//!
//! An order is written once at checkout and afterwards mutated only by
//! admin-driven status transitions. Items are immutable once written.
//! Catalog orders and custom-design orders share the header shape but
//! carry different item variants and different status sets.

use serde::{Deserialize, Serialize};

use super::coupon::CouponSnapshot;
use super::line_item::LineItem;

/// Order kind, decided at placement and fixed for the order's lifetime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderKind {
    Catalog,
    Custom,
}

/// Order status
///
/// Catalog orders move through {Pending, Paid, Cancelled}; custom orders
/// through {Pending, InProgress, Completed, Cancelled}.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether this status belongs to the given order kind's set
    pub fn valid_for(&self, kind: OrderKind) -> bool {
        match kind {
            OrderKind::Catalog => matches!(
                self,
                OrderStatus::Pending | OrderStatus::Paid | OrderStatus::Cancelled
            ),
            OrderKind::Custom => matches!(
                self,
                OrderStatus::Pending
                    | OrderStatus::InProgress
                    | OrderStatus::Completed
                    | OrderStatus::Cancelled
            ),
        }
    }
}

/// Customer identity fields captured on the order header.
/// Phone is the mandatory contact channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
}

/// Order header entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub shipping_address: String,
    pub payment_channel: String,
    /// Computed total in minor currency units, immutable after creation
    pub total_amount: i64,
    /// Coupon snapshot taken at placement, never re-derived
    pub coupon_code: Option<String>,
    pub coupon_discount_percent: Option<i64>,
    pub kind: OrderKind,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// Order item — tagged variant so "custom needs no product but needs a
/// design reference" is enforced at the type level rather than through
/// a bag of nullable columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderItem {
    Catalog {
        product_id: i64,
        size: String,
        quantity: i64,
        /// Unit price in minor currency units
        unit_price: i64,
    },
    Custom {
        size: String,
        quantity: i64,
        /// Unit price in minor currency units
        unit_price: i64,
        color: String,
        image_refs: Vec<String>,
        text: Option<String>,
        options: serde_json::Map<String, serde_json::Value>,
    },
}

impl OrderItem {
    pub fn quantity(&self) -> i64 {
        match self {
            OrderItem::Catalog { quantity, .. } | OrderItem::Custom { quantity, .. } => *quantity,
        }
    }

    pub fn unit_price(&self) -> i64 {
        match self {
            OrderItem::Catalog { unit_price, .. } | OrderItem::Custom { unit_price, .. } => {
                *unit_price
            }
        }
    }

    pub fn line_total(&self) -> i64 {
        self.unit_price() * self.quantity()
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, OrderItem::Custom { .. })
    }

    /// Convert a cart line into its order-item shape
    pub fn from_line_item(line: &LineItem) -> Self {
        match line.item {
            super::line_item::ItemRef::Catalog(product_id) => OrderItem::Catalog {
                product_id,
                size: line.size.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            },
            super::line_item::ItemRef::Custom => {
                let payload = line.custom.clone().unwrap_or_default();
                OrderItem::Custom {
                    size: line.size.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    color: line.color.clone(),
                    image_refs: payload.image_refs,
                    text: payload.text,
                    options: payload.options,
                }
            }
        }
    }
}

/// Order placement payload. The caller supplies the pre-computed total
/// (from the price calculator); the writer trusts it but logs any
/// divergence for reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer: CustomerInfo,
    pub shipping_address: String,
    pub payment_channel: String,
    pub items: Vec<LineItem>,
    pub coupon: Option<CouponSnapshot>,
    pub total_amount: i64,
}

/// Update order status payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// An order header together with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}
