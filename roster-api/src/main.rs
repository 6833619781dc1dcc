//! roster-api - bhajan roster scheduling service
//!
//! Resolves calendar days to sessions, synchronizes roster rows, derives
//! pitch recommendations, and serves fuzzy catalog search.

use anyhow::Result;
use roster_api::{build_router, catalog::CatalogIndex, AppState};
use roster_common::config::Config;
use roster_common::db::init_database;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting roster-api v{}", env!("CARGO_PKG_VERSION"));

    // Optional config file path as the only command-line argument
    let cli_config = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(cli_config.as_deref())?;
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path).await?;

    let catalog = Arc::new(CatalogIndex::new(
        pool.clone(),
        Duration::from_secs(config.search_cache_ttl_secs),
        config.search_result_cap,
    ));

    if config.edit_secret.is_empty() {
        info!("Edit gate disabled (no edit_secret configured)");
    } else {
        info!("Edit gate enabled");
    }

    let state = AppState::new(pool, catalog, config.edit_secret.clone());
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
