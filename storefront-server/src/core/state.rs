//! Server state
//!
//! [`ServerState`] holds shared references to everything a request
//! handler needs: configuration, the SQLite pool, the cached schema
//! capabilities, and the per-list rank mutation locks. Cloning is cheap
//! (Arc-backed fields only).

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::schema::SchemaCaps;
use crate::db::DbService;
use crate::marketing::rank_list::RankLocks;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub db: SqlitePool,
    /// Writable column set, introspected once at startup
    pub schema_caps: Arc<SchemaCaps>,
    /// Per-list mutation locks for the rank list manager
    pub rank_locks: Arc<RankLocks>,
}

impl ServerState {
    /// Initialize the server state:
    ///
    /// 1. Ensure the work directory structure exists
    /// 2. Open the database (WAL mode, migrations applied)
    /// 3. Introspect the schema once and cache the capability set
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        let db_path = db_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Non-UTF8 database path"))?;
        let db = DbService::new(db_path).await?;

        let schema_caps = SchemaCaps::detect(&db.pool).await?;
        tracing::info!(
            custom_options = schema_caps.order_item_has_custom_options,
            "Schema capabilities detected"
        );

        Ok(Self {
            config: config.clone(),
            db: db.pool,
            schema_caps: Arc::new(schema_caps),
            rank_locks: Arc::new(RankLocks::new()),
        })
    }
}
