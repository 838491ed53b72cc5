//! Store Settings Model

use serde::{Deserialize, Serialize};

/// Store-wide pricing configuration (singleton row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StoreSettings {
    pub id: i64,
    /// Flat shipping fee in minor currency units
    pub shipping_fee: i64,
    /// Discounted subtotals at or above this ship free
    pub free_shipping_threshold: i64,
    /// GST rate as a percentage (e.g. 18.0 = 18%)
    pub gst_percentage: f64,
    pub gst_enabled: bool,
    pub updated_at: i64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            id: 1,
            shipping_fee: 0,
            free_shipping_threshold: 0,
            gst_percentage: 0.0,
            gst_enabled: false,
            updated_at: 0,
        }
    }
}

/// Update store settings payload (admin upsert, partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettingsUpdate {
    pub shipping_fee: Option<i64>,
    pub free_shipping_threshold: Option<i64>,
    pub gst_percentage: Option<f64>,
    pub gst_enabled: Option<bool>,
}
