//! Coupon Validator
//!
//! Checks a code against the coupon store. Read-only and side-effect
//! free; rejection reasons are distinct so the storefront can tell the
//! shopper "expired" rather than a generic "invalid". An invalid coupon
//! never fails pricing — callers downgrade to zero discount and pass the
//! reason along for display.

use sqlx::SqlitePool;

use crate::db::repository::{self, RepoError};
use crate::utils::AppError;
use shared::models::CouponSnapshot;

/// Why a coupon was rejected
#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    #[error("Coupon code not found")]
    NotFound,

    #[error("Coupon has expired")]
    Expired,

    #[error("Coupon is not active")]
    Inactive,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<CouponError> for AppError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::NotFound => AppError::NotFound("Coupon code not found".into()),
            CouponError::Expired => AppError::Expired("Coupon has expired".into()),
            CouponError::Inactive => AppError::Invalid("Coupon is not active".into()),
            CouponError::Repo(repo) => repo.into(),
        }
    }
}

/// Validate a code. The lookup canonicalizes (trim + uppercase) before
/// comparing, matching the canonical form coupons are stored under.
pub async fn validate(pool: &SqlitePool, code: &str) -> Result<CouponSnapshot, CouponError> {
    let coupon = repository::coupon::find_by_code(pool, code)
        .await?
        .ok_or(CouponError::NotFound)?;

    if !coupon.is_active {
        return Err(CouponError::Inactive);
    }
    if coupon.expires_at < shared::util::now_millis() {
        return Err(CouponError::Expired);
    }

    Ok(CouponSnapshot {
        code: coupon.code,
        discount_percent: coupon.discount_percent,
    })
}
