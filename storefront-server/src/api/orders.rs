//! Order API
//!
//! Checkout endpoints (catalog and custom) plus the admin surface:
//! listing, detail, status transitions, and deletion with best-effort
//! design-asset cleanup.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository;
use crate::orders::{build_order_message, writer};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{Order, OrderDetail, OrderStatusUpdate, PlaceOrderRequest};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(list).post(place_catalog))
        .route("/api/orders/custom", post(place_custom))
        .route("/api/orders/{id}", get(get_by_id).delete(delete))
        .route("/api/orders/{id}/status", put(update_status))
}

#[derive(Debug, Serialize)]
struct PlacedOrder {
    order_id: i64,
    /// Notification payload for the chat transport
    message: String,
}

async fn place(state: &ServerState, req: &PlaceOrderRequest) -> AppResult<PlacedOrder> {
    let settings = repository::store_settings::get_or_create(&state.db).await?;
    let order_id = writer::place(&state.db, &state.schema_caps, &settings, req).await?;

    let detail = repository::order::find_detail(&state.db, order_id)
        .await?
        .ok_or_else(|| AppError::Internal("Placed order vanished before readback".into()))?;
    Ok(PlacedOrder {
        order_id,
        message: build_order_message(&detail.order, &detail.items),
    })
}

async fn place_catalog(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<AppResponse<PlacedOrder>>> {
    if payload.items.iter().any(|line| line.item.is_custom()) {
        return Err(AppError::Validation(
            "Custom items must be placed through the custom order endpoint".into(),
        ));
    }
    Ok(ok(place(&state, &payload).await?))
}

async fn place_custom(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<AppResponse<PlacedOrder>>> {
    let custom_count = payload
        .items
        .iter()
        .filter(|line| line.item.is_custom())
        .count();
    if custom_count != 1 {
        return Err(AppError::Validation(
            "Custom order must contain exactly one custom item".into(),
        ));
    }
    Ok(ok(place(&state, &payload).await?))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    50
}

async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = repository::order::find_all(&state.db, query.limit, query.offset).await?;
    Ok(ok(orders))
}

async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let detail = repository::order::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
    Ok(ok(detail))
}

async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = repository::order::update_status(&state.db, id, payload.status).await?;
    tracing::info!(order_id = id, status = ?order.status, "order status updated");
    Ok(ok(order))
}

async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    let asset_refs = repository::order::delete(&state.db, id).await?;
    cleanup_assets(&state, &asset_refs).await;
    Ok(ok_with_message((), "Order deleted"))
}

/// Design assets live under the upload directory; removal failures are
/// logged and never surfaced, the order row is already gone.
async fn cleanup_assets(state: &ServerState, asset_refs: &[String]) {
    let upload_dir = std::path::PathBuf::from(&state.config.work_dir).join("uploads");
    for asset in asset_refs {
        // Refs are stored as relative paths; anything else is skipped.
        let relative = std::path::Path::new(asset);
        if relative.is_absolute() || relative.components().any(|c| c.as_os_str() == "..") {
            tracing::warn!(asset, "skipping cleanup of non-relative asset ref");
            continue;
        }
        let path = upload_dir.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!(asset, "deleted design asset"),
            Err(err) => tracing::warn!(asset, %err, "failed to delete design asset"),
        }
    }
}
