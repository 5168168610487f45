//! Binary entry point for the biztime API server.
//!
//! Loads configuration, picks the storage backend (PostgreSQL when
//! `database_url` is set and the `postgres` feature is compiled in,
//! in-memory otherwise) and serves the router.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use biztime::config::AppConfig;
use biztime::server::{self, AppState, build_router};
use biztime::storage::{InMemoryStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biztime=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load()?;
    let store = build_store(&config).await?;

    let app = build_router(AppState::new(store));
    server::serve(&config.bind_addr, app).await
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => connect_postgres(url).await,
        None => {
            tracing::info!("no database_url configured, using the in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

#[cfg(feature = "postgres")]
async fn connect_postgres(url: &str) -> Result<Arc<dyn Store>> {
    use biztime::storage::postgres::{PostgresStore, ensure_schema};

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await?;
    ensure_schema(&pool).await?;

    tracing::info!("connected to PostgreSQL");
    Ok(Arc::new(PostgresStore::new(pool)))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_url: &str) -> Result<Arc<dyn Store>> {
    anyhow::bail!("database_url is set but this binary was built without the `postgres` feature")
}
