//! Store Settings Repository (Singleton)

use super::{RepoError, RepoResult};
use shared::models::{StoreSettings, StoreSettingsUpdate};
use sqlx::SqlitePool;

const SINGLETON_ID: i64 = 1;

const COLUMNS: &str =
    "id, shipping_fee, free_shipping_threshold, gst_percentage, gst_enabled, updated_at";

/// Get the singleton settings row, creating it with defaults on first use
pub async fn get_or_create(pool: &SqlitePool) -> RepoResult<StoreSettings> {
    if let Some(settings) = get(pool).await? {
        return Ok(settings);
    }

    sqlx::query(
        "INSERT OR IGNORE INTO store_settings \
         (id, shipping_fee, free_shipping_threshold, gst_percentage, gst_enabled, updated_at) \
         VALUES (?1, 0, 0, 0, 0, ?2)",
    )
    .bind(SINGLETON_ID)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    get(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create store settings".into()))
}

/// Get the singleton settings row if it exists
pub async fn get(pool: &SqlitePool) -> RepoResult<Option<StoreSettings>> {
    let row =
        sqlx::query_as::<_, StoreSettings>(&format!("SELECT {COLUMNS} FROM store_settings WHERE id = ?"))
            .bind(SINGLETON_ID)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Partial admin upsert. Monetary fields must be non-negative.
pub async fn update(pool: &SqlitePool, data: StoreSettingsUpdate) -> RepoResult<StoreSettings> {
    if data.shipping_fee.is_some_and(|v| v < 0) {
        return Err(RepoError::Validation("shipping_fee must be non-negative".into()));
    }
    if data.free_shipping_threshold.is_some_and(|v| v < 0) {
        return Err(RepoError::Validation(
            "free_shipping_threshold must be non-negative".into(),
        ));
    }
    if data.gst_percentage.is_some_and(|v| v < 0.0) {
        return Err(RepoError::Validation("gst_percentage must be non-negative".into()));
    }

    // Ensure the singleton exists before merging
    get_or_create(pool).await?;

    sqlx::query(
        "UPDATE store_settings SET \
         shipping_fee = COALESCE(?1, shipping_fee), \
         free_shipping_threshold = COALESCE(?2, free_shipping_threshold), \
         gst_percentage = COALESCE(?3, gst_percentage), \
         gst_enabled = COALESCE(?4, gst_enabled), \
         updated_at = ?5 \
         WHERE id = ?6",
    )
    .bind(data.shipping_fee)
    .bind(data.free_shipping_threshold)
    .bind(data.gst_percentage)
    .bind(data.gst_enabled)
    .bind(shared::util::now_millis())
    .bind(SINGLETON_ID)
    .execute(pool)
    .await?;

    get(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to update store settings".into()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE store_settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                shipping_fee INTEGER NOT NULL DEFAULT 0,
                free_shipping_threshold INTEGER NOT NULL DEFAULT 0,
                gst_percentage REAL NOT NULL DEFAULT 0,
                gst_enabled INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn get_or_create_seeds_defaults() {
        let pool = test_pool().await;
        let settings = get_or_create(&pool).await.unwrap();
        assert_eq!(settings.shipping_fee, 0);
        assert!(!settings.gst_enabled);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let pool = test_pool().await;
        update(
            &pool,
            StoreSettingsUpdate {
                shipping_fee: Some(99),
                free_shipping_threshold: Some(999),
                gst_percentage: Some(18.0),
                gst_enabled: Some(true),
            },
        )
        .await
        .unwrap();

        let settings = update(
            &pool,
            StoreSettingsUpdate {
                shipping_fee: Some(49),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(settings.shipping_fee, 49);
        assert_eq!(settings.free_shipping_threshold, 999);
        assert!(settings.gst_enabled);
    }

    #[tokio::test]
    async fn negative_monetary_fields_are_rejected() {
        let pool = test_pool().await;
        let err = update(
            &pool,
            StoreSettingsUpdate {
                shipping_fee: Some(-1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
