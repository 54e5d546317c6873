//! Test harness for integration testing.
//!
//! `TestHarness::new()` runs everything in memory. `TestHarness::with_postgres()`
//! uses a shared testcontainers Postgres: the container starts and migrations
//! run once, then every test reuses it (tests keep apart by using their own
//! scopes).

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use server_core::domains::auth::JwtService;
use server_core::domains::resources::ResourceStore;
use server_core::kernel::{PostgresResourceRepository, ServerDeps};
use server_core::server::build_app;

use super::ApiClient;

const TEST_SECRET: &str = "test_secret";
const TEST_ISSUER: &str = "test_issuer";

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Shared Postgres container that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that owns a fully wired application.
pub struct TestHarness {
    pub deps: ServerDeps,
    router: Router,
}

impl TestHarness {
    /// In-memory store behind the real router.
    pub fn new() -> Self {
        init_tracing();
        Self::from_deps(ServerDeps::in_memory(Self::jwt_service()))
    }

    /// Postgres store in the shared container.
    pub async fn with_postgres() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self::from_deps(ServerDeps::new(
            Arc::new(PostgresResourceRepository::new(pool)),
            Arc::new(Self::jwt_service()),
        )))
    }

    fn jwt_service() -> JwtService {
        JwtService::new(TEST_SECRET, TEST_ISSUER.to_string())
    }

    fn from_deps(deps: ServerDeps) -> Self {
        let router = build_app(deps.clone(), Vec::new(), None);
        Self { deps, router }
    }

    pub fn store(&self) -> ResourceStore {
        self.deps.store()
    }

    /// Unauthenticated client.
    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.router.clone())
    }

    /// Client carrying an admin token.
    pub fn admin(&self) -> ApiClient {
        self.api().with_token(self.token("admin@example.org", true))
    }

    /// Client carrying a valid token without admin rights.
    pub fn editor(&self) -> ApiClient {
        self.api().with_token(self.token("editor@example.org", false))
    }

    pub fn token(&self, subject: &str, is_admin: bool) -> String {
        self.deps
            .jwt_service
            .create_token(subject, is_admin)
            .expect("Failed to create test token")
    }
}
