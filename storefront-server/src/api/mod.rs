//! HTTP API modules
//!
//! Each module owns its routes and nests them under `/api`; the server
//! merges the routers in `core::server::build_router`.

pub mod coupons;
pub mod health;
pub mod orders;
pub mod pricing;
pub mod rank_lists;
pub mod settings;
