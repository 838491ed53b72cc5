//! Coupon Model
//!
//! Percentage-discount codes with an expiry date. Codes are canonicalized
//! (trim + uppercase) before storage and before lookup so matching is
//! case-insensitive.

use serde::{Deserialize, Serialize};

/// Coupon entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: i64,
    /// Canonical (upper-case) code, unique
    pub code: String,
    /// Percentage discount, 1-100
    pub discount_percent: i64,
    /// Expiry instant (Unix millis). A coupon is usable while
    /// `expires_at >= now`.
    pub expires_at: i64,
    pub is_active: bool,
    pub created_at: i64,
}

impl Coupon {
    /// Canonical form used for both storage and lookup
    pub fn canonicalize(code: &str) -> String {
        code.trim().to_uppercase()
    }
}

/// Create coupon payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponCreate {
    pub code: String,
    pub discount_percent: i64,
    pub expires_at: i64,
}

/// The part of a coupon that survives into pricing and onto the order
/// header (snapshotted, never re-derived later).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponSnapshot {
    pub code: String,
    pub discount_percent: i64,
}
