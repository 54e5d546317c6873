//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container handed to the HTTP
//! layer and the CLI. Storage goes through `BaseResourceRepository`, so the
//! same wiring runs against Postgres in production and memory in tests.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::config::Config;
use crate::domains::auth::{AdminGateway, JwtService};
use crate::domains::resources::{PublicReader, ResourceStore};
use crate::kernel::{BaseResourceRepository, InMemoryResourceRepository, PostgresResourceRepository};

// =============================================================================
// ServerDeps
// =============================================================================

/// Shared dependencies for request handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub repository: Arc<dyn BaseResourceRepository>,
    /// JWT service for token verification (and issuance in the CLI)
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(repository: Arc<dyn BaseResourceRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            repository,
            jwt_service,
        }
    }

    /// Build dependencies from configuration.
    ///
    /// With `DATABASE_URL` set this connects, runs migrations and uses
    /// Postgres; otherwise records live in memory for the life of the process.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let repository: Arc<dyn BaseResourceRepository> = match &config.database_url {
            Some(database_url) => {
                tracing::info!("Connecting to database...");
                let pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .connect(database_url)
                    .await
                    .context("Failed to connect to database")?;
                tracing::info!("Database connected");

                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run migrations")?;
                tracing::info!("Migrations complete");

                Arc::new(PostgresResourceRepository::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set - records are kept in memory only");
                Arc::new(InMemoryResourceRepository::new())
            }
        };

        let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

        Ok(Self::new(repository, jwt_service))
    }

    /// In-memory dependencies, for tests and local experiments
    pub fn in_memory(jwt_service: JwtService) -> Self {
        Self::new(
            Arc::new(InMemoryResourceRepository::new()),
            Arc::new(jwt_service),
        )
    }

    pub fn store(&self) -> ResourceStore {
        ResourceStore::new(self.repository.clone())
    }

    pub fn public_reader(&self) -> PublicReader {
        PublicReader::new(self.store())
    }

    pub fn admin_gateway(&self) -> AdminGateway {
        AdminGateway::new(self.store())
    }
}
