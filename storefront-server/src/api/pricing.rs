//! Pricing API
//!
//! Quote endpoint for the checkout preview. An invalid coupon code never
//! fails the quote; the breakdown comes back undiscounted with a
//! `coupon_error` the storefront can show next to the input.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository;
use crate::marketing::{self, CouponError};
use crate::pricing::{self, PriceBreakdown};
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::{CouponSnapshot, LineItem};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/pricing/quote", post(quote))
}

#[derive(Debug, Deserialize)]
struct QuoteRequest {
    items: Vec<LineItem>,
    coupon_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct QuoteResponse {
    #[serde(flatten)]
    breakdown: PriceBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    coupon: Option<CouponSnapshot>,
    /// Set when a coupon code was supplied but rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    coupon_error: Option<String>,
}

async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<AppResponse<QuoteResponse>>> {
    let settings = repository::store_settings::get_or_create(&state.db).await?;

    let (coupon, coupon_error) = match payload.coupon_code.as_deref() {
        Some(code) if !code.trim().is_empty() => {
            match marketing::coupon::validate(&state.db, code).await {
                Ok(snapshot) => (Some(snapshot), None),
                Err(CouponError::Repo(err)) => return Err(err.into()),
                Err(rejected) => (None, Some(rejected.to_string())),
            }
        }
        _ => (None, None),
    };

    let breakdown = pricing::compute(&payload.items, coupon.as_ref(), &settings);
    Ok(ok(QuoteResponse {
        breakdown,
        coupon,
        coupon_error,
    }))
}
