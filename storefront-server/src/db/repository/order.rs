//! Order Repository
//!
//! Order header + items are written as one transaction: either all rows
//! become visible or none. Item inserts branch on the cached schema
//! capability set so deployments missing the optional `custom_options`
//! column (mid rolling upgrade) still accept orders; the reduced insert
//! omits only that column.

use super::{RepoError, RepoResult};
use crate::db::schema::SchemaCaps;
use shared::models::{
    CUSTOM_PRODUCT_ID, Order, OrderDetail, OrderItem, OrderStatus,
};
use sqlx::{Row, SqlitePool};

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, \
     shipping_address, payment_channel, total_amount, coupon_code, \
     coupon_discount_percent, kind, status, created_at";

/// Persist an order header and its items atomically. Returns the order id.
pub async fn insert(
    pool: &SqlitePool,
    caps: &SchemaCaps,
    order: &Order,
    items: &[OrderItem],
) -> RepoResult<i64> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders \
         (id, customer_name, customer_email, customer_phone, shipping_address, \
          payment_channel, total_amount, coupon_code, coupon_discount_percent, \
          kind, status, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(order.id)
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(&order.customer_phone)
    .bind(&order.shipping_address)
    .bind(&order.payment_channel)
    .bind(order.total_amount)
    .bind(&order.coupon_code)
    .bind(order.coupon_discount_percent)
    .bind(order.kind)
    .bind(order.status)
    .bind(order.created_at)
    .execute(&mut *tx)
    .await?;

    for item in items {
        insert_item(&mut tx, caps, order.id, item).await?;
    }

    tx.commit().await?;
    Ok(order.id)
}

async fn insert_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    caps: &SchemaCaps,
    order_id: i64,
    item: &OrderItem,
) -> RepoResult<()> {
    match item {
        OrderItem::Catalog {
            product_id,
            size,
            quantity,
            unit_price,
        } => {
            sqlx::query(
                "INSERT INTO order_item (order_id, product_id, size, quantity, unit_price) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(size)
            .bind(quantity)
            .bind(unit_price)
            .execute(&mut **tx)
            .await?;
        }
        OrderItem::Custom {
            size,
            quantity,
            unit_price,
            color,
            image_refs,
            text,
            options,
        } => {
            let image_refs_json = serde_json::to_string(image_refs)
                .map_err(|e| RepoError::Database(format!("Failed to encode image refs: {e}")))?;

            if caps.order_item_has_custom_options {
                let options_json = serde_json::to_string(options).map_err(|e| {
                    RepoError::Database(format!("Failed to encode custom options: {e}"))
                })?;
                sqlx::query(
                    "INSERT INTO order_item \
                     (order_id, product_id, size, quantity, unit_price, \
                      custom_color, custom_image_refs, custom_text, custom_options) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )
                .bind(order_id)
                .bind(CUSTOM_PRODUCT_ID)
                .bind(size)
                .bind(quantity)
                .bind(unit_price)
                .bind(color)
                .bind(image_refs_json)
                .bind(text)
                .bind(options_json)
                .execute(&mut **tx)
                .await?;
            } else {
                // Reduced insert for schemas that predate custom_options
                sqlx::query(
                    "INSERT INTO order_item \
                     (order_id, product_id, size, quantity, unit_price, \
                      custom_color, custom_image_refs, custom_text) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )
                .bind(order_id)
                .bind(CUSTOM_PRODUCT_ID)
                .bind(size)
                .bind(quantity)
                .bind(unit_price)
                .bind(color)
                .bind(image_refs_json)
                .bind(text)
                .execute(&mut **tx)
                .await?;
            }
        }
    }
    Ok(())
}

/// List order headers, newest first
pub async fn find_all(pool: &SqlitePool, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Header plus items
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = items_for_order(pool, id).await?;
    Ok(Some(OrderDetail { order, items }))
}

/// Items of one order, in insertion order.
///
/// Reads with `SELECT *` and tolerates an absent `custom_options` column
/// so the same binary serves both schema generations.
pub async fn items_for_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query("SELECT * FROM order_item WHERE order_id = ? ORDER BY id")
        .bind(order_id)
        .fetch_all(pool)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        let product_id: i64 = row.try_get("product_id")?;
        let size: String = row.try_get("size")?;
        let quantity: i64 = row.try_get("quantity")?;
        let unit_price: i64 = row.try_get("unit_price")?;

        let item = if product_id == CUSTOM_PRODUCT_ID {
            let color: Option<String> = row.try_get("custom_color")?;
            let image_refs_json: Option<String> = row.try_get("custom_image_refs")?;
            let text: Option<String> = row.try_get("custom_text")?;
            let options_json: Option<String> = row.try_get("custom_options").unwrap_or(None);

            let image_refs = image_refs_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(|e| RepoError::Database(format!("Corrupt image refs: {e}")))?
                .unwrap_or_default();
            let options = options_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(|e| RepoError::Database(format!("Corrupt custom options: {e}")))?
                .unwrap_or_default();

            OrderItem::Custom {
                size,
                quantity,
                unit_price,
                color: color.unwrap_or_default(),
                image_refs,
                text,
                options,
            }
        } else {
            OrderItem::Catalog {
                product_id,
                size,
                quantity,
                unit_price,
            }
        };
        items.push(item);
    }
    Ok(items)
}

/// Admin-driven status transition, validated against the order kind's
/// status set.
pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let order = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;

    if !status.valid_for(order.kind) {
        return Err(RepoError::Validation(format!(
            "Status {status:?} is not valid for a {:?} order",
            order.kind
        )));
    }

    sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Delete an order and its items in one transaction. Returns the design
/// asset references of any custom items so the caller can clean up
/// external storage afterwards.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<Vec<String>> {
    let detail = find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;

    let asset_refs: Vec<String> = detail
        .items
        .iter()
        .filter_map(|item| match item {
            OrderItem::Custom { image_refs, .. } => Some(image_refs.clone()),
            OrderItem::Catalog { .. } => None,
        })
        .flatten()
        .collect();

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(asset_refs)
}
