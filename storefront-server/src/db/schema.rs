//! Schema capability negotiation
//!
//! An older deployment mid rolling upgrade may lack optional columns
//! added by later migrations (the writer must keep accepting orders
//! against it while the schema catches up). Instead of catching insert
//! failures per write, the column set is introspected once at startup
//! and writers branch deterministically on the cached capability set.

use std::collections::HashSet;

use sqlx::{Row, SqlitePool};

use crate::db::repository::RepoResult;

/// Cached writable-column capabilities, detected once at startup
#[derive(Debug, Clone)]
pub struct SchemaCaps {
    /// All columns currently present on `order_item`
    pub order_item_columns: HashSet<String>,
    /// Whether the optional `custom_options` column exists
    pub order_item_has_custom_options: bool,
}

impl SchemaCaps {
    /// Introspect the live schema via `PRAGMA table_info`
    pub async fn detect(pool: &SqlitePool) -> RepoResult<Self> {
        let columns = table_columns(pool, "order_item").await?;
        let has_custom_options = columns.contains("custom_options");
        Ok(Self {
            order_item_columns: columns,
            order_item_has_custom_options: has_custom_options,
        })
    }

    /// Capabilities for a schema that has every optional column.
    /// Used by tests that build the full schema inline.
    pub fn full() -> Self {
        let mut columns = HashSet::new();
        for col in [
            "id",
            "order_id",
            "product_id",
            "size",
            "quantity",
            "unit_price",
            "custom_color",
            "custom_image_refs",
            "custom_text",
            "custom_options",
        ] {
            columns.insert(col.to_string());
        }
        Self {
            order_item_columns: columns,
            order_item_has_custom_options: true,
        }
    }
}

/// Column names of a table, from `PRAGMA table_info`
async fn table_columns(pool: &SqlitePool, table: &str) -> RepoResult<HashSet<String>> {
    let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
        .fetch_all(pool)
        .await?;
    Ok(rows
        .iter()
        .map(|row| row.get::<String, _>("name"))
        .collect())
}
