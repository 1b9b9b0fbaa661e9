use std::sync::Arc;

use configs::AuthConfig;
use sea_orm::DatabaseConnection;
use service::{ResourceRegistry, SharedRegistry};

/// State of the in-memory server.
#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(registry: ResourceRegistry, auth: AuthConfig) -> Self {
        Self { registry: Arc::new(registry), auth: Arc::new(auth) }
    }
}

/// State of the database-backed server.
#[derive(Clone)]
pub struct DbState {
    pub db: DatabaseConnection,
}
