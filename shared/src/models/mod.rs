//! Data models
//!
//! Shared between the storefront server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY or snowflake).

pub mod coupon;
pub mod line_item;
pub mod order;
pub mod rank;
pub mod settings;

// Re-exports
pub use coupon::*;
pub use line_item::*;
pub use order::*;
pub use rank::*;
pub use settings::*;
