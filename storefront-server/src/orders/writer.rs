//! Order Writer
//!
//! Validates a checkout request, freezes it into an order header plus
//! item rows, and hands the whole batch to the repository for a single
//! transactional insert. Every precondition is checked before the first
//! write so a rejected request leaves no trace.

use sqlx::SqlitePool;

use crate::db::repository;
use crate::db::schema::SchemaCaps;
use crate::pricing;
use crate::utils::{AppError, AppResult};
use shared::models::{Order, OrderItem, OrderKind, OrderStatus, PlaceOrderRequest, StoreSettings};
use shared::util::{now_millis, snowflake_id};

fn validate(req: &PlaceOrderRequest) -> AppResult<()> {
    if req.customer.name.trim().is_empty() {
        return Err(AppError::Validation("Customer name is required".into()));
    }
    if req.customer.phone.trim().is_empty() {
        return Err(AppError::Validation("Customer phone is required".into()));
    }
    if req.items.is_empty() {
        return Err(AppError::Validation(
            "Order must contain at least one item".into(),
        ));
    }
    for line in &req.items {
        if line.quantity <= 0 {
            return Err(AppError::Validation("Item quantity must be positive".into()));
        }
        if line.item.is_custom() && !line.has_design_asset() {
            return Err(AppError::Validation(
                "Custom item requires at least one design image".into(),
            ));
        }
    }
    if let Some(coupon) = &req.coupon {
        if !(1..=100).contains(&coupon.discount_percent) {
            return Err(AppError::Validation(
                "Coupon discount percent must be between 1 and 100".into(),
            ));
        }
    }
    Ok(())
}

/// Persist a validated checkout as a pending order. Returns the new
/// order id; header and items commit or roll back as one unit.
///
/// The request total was computed by the quote endpoint the shopper
/// already saw, so it is stored as-is; a recomputed total that
/// disagrees is logged for reconciliation, not rejected.
pub async fn place(
    pool: &SqlitePool,
    caps: &SchemaCaps,
    settings: &StoreSettings,
    req: &PlaceOrderRequest,
) -> AppResult<i64> {
    validate(req)?;

    let recomputed = pricing::compute(&req.items, req.coupon.as_ref(), settings);
    if recomputed.total != req.total_amount {
        tracing::warn!(
            submitted = req.total_amount,
            recomputed = recomputed.total,
            "order total does not match recomputed breakdown"
        );
    }

    let kind = if req.items.iter().any(|line| line.item.is_custom()) {
        OrderKind::Custom
    } else {
        OrderKind::Catalog
    };

    let order = Order {
        id: snowflake_id(),
        customer_name: req.customer.name.trim().to_string(),
        customer_email: req.customer.email.clone(),
        customer_phone: req.customer.phone.trim().to_string(),
        shipping_address: req.shipping_address.clone(),
        payment_channel: req.payment_channel.clone(),
        total_amount: req.total_amount,
        coupon_code: req.coupon.as_ref().map(|c| c.code.clone()),
        coupon_discount_percent: req.coupon.as_ref().map(|c| c.discount_percent),
        kind,
        status: OrderStatus::Pending,
        created_at: now_millis(),
    };
    let items: Vec<OrderItem> = req.items.iter().map(OrderItem::from_line_item).collect();

    let id = repository::order::insert(pool, caps, &order, &items).await?;
    tracing::info!(order_id = id, kind = ?kind, items = items.len(), "order placed");
    Ok(id)
}
