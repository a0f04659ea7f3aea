//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::search::SearchService;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Catalog search service.
    search: SearchService,
}

impl AppState {
    /// Initialize application state: connect to the database and run
    /// pending migrations.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config).await?;
        db::run_migrations(&pool).await?;
        info!("database schema up to date");

        Ok(Self::from_pool(pool))
    }

    /// Build state around an existing pool (used by tests).
    pub fn from_pool(pool: PgPool) -> Self {
        let search = SearchService::new(pool.clone());

        Self {
            inner: Arc::new(AppStateInner { db: pool, search }),
        }
    }

    /// Access the database pool.
    pub fn pool(&self) -> &PgPool {
        &self.inner.db
    }

    /// Access the search service.
    pub fn search(&self) -> &SearchService {
        &self.inner.search
    }

    /// Check PostgreSQL connectivity.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}
