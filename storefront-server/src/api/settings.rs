//! Store Settings API

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::core::ServerState;
use crate::db::repository;
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::{StoreSettings, StoreSettingsUpdate};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/settings", get(get_settings).put(update_settings))
}

async fn get_settings(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<StoreSettings>>> {
    let settings = repository::store_settings::get_or_create(&state.db).await?;
    Ok(ok(settings))
}

async fn update_settings(
    State(state): State<ServerState>,
    Json(payload): Json<StoreSettingsUpdate>,
) -> AppResult<Json<AppResponse<StoreSettings>>> {
    let settings = repository::store_settings::update(&state.db, payload).await?;
    tracing::info!("store settings updated");
    Ok(ok(settings))
}
