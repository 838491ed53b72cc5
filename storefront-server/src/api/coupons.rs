//! Coupon API
//!
//! Admin CRUD plus the shopper-facing validate endpoint.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository;
use crate::marketing;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{Coupon, CouponCreate, CouponSnapshot};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/coupons", get(list).post(create))
        .route("/api/coupons/{id}", axum::routing::delete(delete))
        .route("/api/coupons/validate", post(validate))
}

async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Coupon>>>> {
    let coupons = repository::coupon::find_all(&state.db).await?;
    Ok(ok(coupons))
}

async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<AppResponse<Coupon>>> {
    let coupon = repository::coupon::create(&state.db, payload).await?;
    tracing::info!(code = %coupon.code, "coupon created");
    Ok(ok(coupon))
}

async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    if !repository::coupon::delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Coupon {id} not found")));
    }
    Ok(ok_with_message((), "Coupon deleted"))
}

#[derive(Debug, Deserialize)]
struct ValidateRequest {
    code: String,
}

async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<ValidateRequest>,
) -> AppResult<Json<AppResponse<CouponSnapshot>>> {
    let snapshot = marketing::coupon::validate(&state.db, &payload.code).await?;
    Ok(ok(snapshot))
}
