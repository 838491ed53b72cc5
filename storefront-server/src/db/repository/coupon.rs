//! Coupon Repository
//!
//! Codes are canonicalized (trim + uppercase) before storage so lookup
//! only ever compares canonical forms.

use super::{RepoError, RepoResult};
use shared::models::{Coupon, CouponCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, code, discount_percent, expires_at, is_active, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Coupon>> {
    let rows = sqlx::query_as::<_, Coupon>(&format!(
        "SELECT {COLUMNS} FROM coupon ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lookup by canonical code
pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Coupon>> {
    let canonical = Coupon::canonicalize(code);
    let row = sqlx::query_as::<_, Coupon>(&format!("SELECT {COLUMNS} FROM coupon WHERE code = ?"))
        .bind(canonical)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Coupon>> {
    let row = sqlx::query_as::<_, Coupon>(&format!("SELECT {COLUMNS} FROM coupon WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CouponCreate) -> RepoResult<Coupon> {
    let code = Coupon::canonicalize(&data.code);
    if code.is_empty() {
        return Err(RepoError::Validation("Coupon code must not be empty".into()));
    }
    if !(1..=100).contains(&data.discount_percent) {
        return Err(RepoError::Validation(format!(
            "Discount percent must be within 1-100, got {}",
            data.discount_percent
        )));
    }
    if find_by_code(pool, &code).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Coupon '{code}' already exists"
        )));
    }

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO coupon (code, discount_percent, expires_at, is_active, created_at) \
         VALUES (?1, ?2, ?3, 1, ?4) RETURNING id",
    )
    .bind(&code)
    .bind(data.discount_percent)
    .bind(data.expires_at)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create coupon".into()))
}

/// Hard delete; coupons are never mutated except deletion
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM coupon WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
