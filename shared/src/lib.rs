//! Shared types for the storefront service
//!
//! Domain models shared between the server and API clients, plus small
//! utilities (timestamps, ID generation). DB row types gate their
//! `sqlx::FromRow` derives behind the `db` feature so API clients can
//! depend on this crate without pulling in sqlx.

pub mod models;
pub mod util;

pub use serde::{Deserialize, Serialize};
