//! Rank List API
//!
//! Admin maintenance of the promoted-product lists. Every mutation
//! responds with the list's updated entries so the admin UI can render
//! the new ordering without a follow-up read.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::marketing::rank_list;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{MoveDirection, RankList, RankedEntry};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/rank-lists/{list}", get(list))
        .route("/api/rank-lists/{list}/add", post(add))
        .route("/api/rank-lists/{list}/remove", post(remove))
        .route("/api/rank-lists/{list}/move", post(move_entry))
}

fn parse_list(name: &str) -> AppResult<RankList> {
    RankList::parse(name)
        .ok_or_else(|| AppError::Validation(format!("Unknown rank list: {name}")))
}

#[derive(Debug, Deserialize)]
struct EntryRequest {
    product_id: i64,
}

#[derive(Debug, Deserialize)]
struct MoveRequest {
    product_id: i64,
    direction: MoveDirection,
}

async fn list(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<AppResponse<Vec<RankedEntry>>>> {
    let list = parse_list(&name)?;
    let entries = rank_list::list(&state.db, list).await?;
    Ok(ok(entries))
}

async fn add(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Json(payload): Json<EntryRequest>,
) -> AppResult<Json<AppResponse<Vec<RankedEntry>>>> {
    let list = parse_list(&name)?;
    rank_list::add(&state.db, &state.rank_locks, list, payload.product_id).await?;
    Ok(ok(rank_list::list(&state.db, list).await?))
}

async fn remove(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Json(payload): Json<EntryRequest>,
) -> AppResult<Json<AppResponse<Vec<RankedEntry>>>> {
    let list = parse_list(&name)?;
    rank_list::remove(&state.db, &state.rank_locks, list, payload.product_id).await?;
    Ok(ok(rank_list::list(&state.db, list).await?))
}

async fn move_entry(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<AppResponse<Vec<RankedEntry>>>> {
    let list = parse_list(&name)?;
    rank_list::move_entry(
        &state.db,
        &state.rank_locks,
        list,
        payload.product_id,
        payload.direction,
    )
    .await?;
    Ok(ok(rank_list::list(&state.db, list).await?))
}
