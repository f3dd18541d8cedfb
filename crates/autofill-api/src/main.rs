use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use autofill_api::{logging, router, AppState, ServerConfig};
use autofill_core::defaults::BACKFILL_BATCH_SIZE;
use autofill_db::{log_pool_metrics, Database, PoolConfig};
use autofill_match::{AutofillConfig, AutofillService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = logging::init_tracing();

    let config = ServerConfig::from_env();
    let autofill_config = AutofillConfig::from_env();
    info!(
        subsystem = "api",
        per_source_limit = autofill_config.per_source_limit,
        max_candidates = autofill_config.max_candidates,
        autofill_threshold = autofill_config.autofill_threshold,
        query_timeout_ms = config.query_timeout.as_millis() as u64,
        "Autofill configuration loaded"
    );

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect_with_config(&config.database_url, PoolConfig::from_env())
        .await?
        .with_query_timeout(config.query_timeout);
    info!("Database connected");

    db.migrate().await?;
    info!("Migrations applied");

    if config.backfill_keys {
        let (live, legacy) = db.backfill_keys(BACKFILL_BATCH_SIZE).await?;
        info!(live_rows = live, legacy_rows = legacy, "Startup key backfill finished");
    }
    log_pool_metrics(db.pool());

    let service = AutofillService::new(
        Arc::new(db.live.clone()),
        Arc::new(db.legacy.clone()),
        autofill_config,
    );
    let app = router(AppState { service }, config.allowed_origins.clone());

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
