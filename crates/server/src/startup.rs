use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use service::ResourceRegistry;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::{AppState, DbState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn serve(addr: SocketAddr, app: Router, service: &'static str) -> anyhow::Result<()> {
    info!(%addr, service, event = "listening", "starting http listener");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// In-memory server: seeded registry, static bearer token.
pub async fn run_memory(cfg: AppConfig) -> anyhow::Result<()> {
    let registry = ResourceRegistry::with_samples()?;
    let state = AppState::new(registry, cfg.auth.clone());
    let app = routes::build_memory_router(state, build_cors());
    serve(cfg.server.bind_addr().parse()?, app, "memory-server").await
}

/// Database server: connect, migrate, serve.
pub async fn run_database(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_sqlite_dir(&cfg.database.url).await?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "migrations_applied", "database schema up to date");
    let app = routes::build_db_router(DbState { db }, build_cors());
    serve(cfg.db_server.bind_addr().parse()?, app, "db-server").await
}
