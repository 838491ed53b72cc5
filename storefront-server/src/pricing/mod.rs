//! Pricing subsystem
//!
//! The calculator is the single source of truth for price breakdowns;
//! both quote display and the persisted order total come from it.

pub mod calculator;

pub use calculator::{PriceBreakdown, compute};
