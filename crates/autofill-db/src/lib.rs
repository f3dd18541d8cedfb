//! # autofill-db
//!
//! PostgreSQL record stores for the vehicle autofill engine.
//!
//! This crate provides:
//! - Connection pool management
//! - The live vehicle store (`vehicle`) and the legacy registry store (`legacy_vehicle`)
//! - SQL translation of store-agnostic `AnyOf` lookups
//! - Key backfill for rows written without precomputed keys
//! - An in-memory store for tests and local development
//!
//! ## Example
//!
//! ```rust,ignore
//! use autofill_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/autofill").await?;
//!     let health = db.live.health().await?;
//!     println!("{} live records", health.approximate_count);
//!     Ok(())
//! }
//! ```
pub mod any_of;
pub mod legacy;
pub mod live;
pub mod memory;
pub mod pool;
mod records;
mod table;
pub mod timeout;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

use std::time::Duration;

use tracing::info;

// Re-export core types
pub use autofill_core::*;

pub use any_of::{bind_params, AnyOfQueryBuilder, QueryParam, StoreColumns};
pub use legacy::{PgLegacyRegistryStore, LEGACY_COLUMNS};
pub use live::{PgLiveVehicleStore, LIVE_COLUMNS};
pub use memory::MemoryRecordStore;
pub use pool::{create_pool, log_pool_metrics, PoolConfig};
pub use timeout::within_budget;

/// Combined database context with both record stores.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Operational vehicle records.
    pub live: PgLiveVehicleStore,
    /// Bulk-imported historical registry.
    pub legacy: PgLegacyRegistryStore,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            live: PgLiveVehicleStore::new(pool.clone()),
            legacy: PgLegacyRegistryStore::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Apply the same per-query budget to both stores.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.live = self.live.with_query_timeout(timeout);
        self.legacy = self.legacy.with_query_timeout(timeout);
        self
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Fill missing keys in both stores. Returns `(live, legacy)` rows updated.
    pub async fn backfill_keys(&self, batch_size: i64) -> Result<(u64, u64)> {
        let live = self.live.backfill_keys(batch_size).await?;
        let legacy = self.legacy.backfill_keys(batch_size).await?;
        info!(
            subsystem = "db",
            op = "backfill_keys",
            live_rows = live,
            legacy_rows = legacy,
            "Record keys backfilled"
        );
        Ok((live, legacy))
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
