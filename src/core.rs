//! Core PageHaus functionality
//!
//! This module contains the main PageHaus struct, which owns the PostgreSQL
//! pool and hands out query sessions bound to it.

use raw_query::{DiagnosticsSink, PgExecutor, PgSession, QuerySession, RawQuery};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::PageHausError;
use config::{AppConfig, DatabaseConfig, QueryConfig};

/// Main PageHaus coordinator that manages the database connection
pub struct PageHaus {
    pool: PgPool,
    query_config: QueryConfig,
    sink: Option<Arc<dyn DiagnosticsSink>>,
}

impl std::fmt::Debug for PageHaus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHaus")
            .field("query_config", &self.query_config)
            .field("has_custom_sink", &self.sink.is_some())
            .finish()
    }
}

impl PageHaus {
    /// Create new PageHaus with database connection
    pub async fn new(config: DatabaseConfig) -> Result<Self, PageHausError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        tracing::debug!(
            host = %config.host,
            database = %config.database,
            max_connections = config.max_connections,
            "connected to PostgreSQL"
        );

        Ok(Self::from_pool(pool))
    }

    /// Create PageHaus from a full application config
    pub async fn from_config(config: AppConfig) -> Result<Self, PageHausError> {
        config.validate()?;
        let query_config = config.query.clone();
        Ok(Self::new(config.database).await?.with_query_config(query_config))
    }

    /// Load configuration from the environment and connect
    pub async fn from_env() -> Result<Self, PageHausError> {
        Self::from_config(AppConfig::load()?).await
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            query_config: QueryConfig::default(),
            sink: None,
        }
    }

    pub fn with_query_config(mut self, query_config: QueryConfig) -> Self {
        self.query_config = query_config;
        self
    }

    /// Route execution errors to a custom sink instead of `tracing`
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn query_config(&self) -> &QueryConfig {
        &self.query_config
    }

    /// Create a query session over this pool
    pub fn session(&self) -> PgSession {
        let session = QuerySession::new(PgExecutor::new(self.pool.clone()))
            .with_config(self.query_config.clone());

        match &self.sink {
            Some(sink) => session.with_sink(Arc::clone(sink)),
            None => session,
        }
    }

    /// Start a raw query from a SQL template
    pub fn query(&self, template: impl Into<String>) -> RawQuery {
        RawQuery::new(template)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), PageHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
