//! CLI for operating the resource store
//!
//! Runs migrations, inspects partitions, compacts display order and mints
//! bearer tokens for the admin console. Every command prints one JSON line
//! in the same `{ success, data?, error? }` envelope the HTTP API uses.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use server_core::common::ApiResponse;
use server_core::config::Config;
use server_core::domains::resources::models::{Partition, ResourceKind};
use server_core::domains::resources::{ReadFilter, ResourceStore};
use server_core::domains::auth::JwtService;
use server_core::kernel::PostgresResourceRepository;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "content_cli")]
#[command(about = "Resource store maintenance CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// List the records of one partition in display order
    List {
        #[arg(long)]
        kind: String,
        #[arg(long)]
        scope: Option<String>,
        /// Include inactive records
        #[arg(long)]
        all: bool,
    },

    /// Renumber a partition to 1..n
    Compact {
        #[arg(long)]
        kind: String,
        #[arg(long)]
        scope: Option<String>,
    },

    /// Issue a bearer token
    Token {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        admin: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenInfo {
    token: String,
    subject: String,
    is_admin: bool,
}

fn output<T: Serialize>(resp: &ApiResponse<T>) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string(resp).context("Failed to serialize response")?
    );
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Migrate => cmd_migrate(&config).await,
        Commands::List { kind, scope, all } => cmd_list(&config, &kind, scope, all).await,
        Commands::Compact { kind, scope } => cmd_compact(&config, &kind, scope).await,
        Commands::Token { subject, admin } => cmd_token(&config, subject, admin),
    }
}

async fn get_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for this command")?;
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

async fn get_store(config: &Config) -> Result<ResourceStore> {
    let pool = get_pool(config).await?;
    Ok(ResourceStore::new(Arc::new(PostgresResourceRepository::new(
        pool,
    ))))
}

// ============================================================================
// Commands
// ============================================================================

async fn cmd_migrate(config: &Config) -> Result<()> {
    let pool = get_pool(config).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    output(&ApiResponse::<()>::done())
}

async fn cmd_list(config: &Config, kind: &str, scope: Option<String>, all: bool) -> Result<()> {
    let kind: ResourceKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return output(&ApiResponse::<()>::failure(e.to_string())),
    };

    let store = get_store(config).await?;
    let filter = if all {
        ReadFilter::all()
    } else {
        ReadFilter::active()
    };

    match store.read(kind, scope, filter).await {
        Ok(records) => output(&ApiResponse::ok(records)),
        Err(e) => output(&ApiResponse::<()>::failure(e.to_string())),
    }
}

async fn cmd_compact(config: &Config, kind: &str, scope: Option<String>) -> Result<()> {
    let kind: ResourceKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return output(&ApiResponse::<()>::failure(e.to_string())),
    };

    let store = get_store(config).await?;
    let partition = Partition::new(kind, scope);

    match store.compact(&partition).await {
        Ok(records) => output(&ApiResponse::ok(records)),
        Err(e) => output(&ApiResponse::<()>::failure(e.to_string())),
    }
}

fn cmd_token(config: &Config, subject: String, is_admin: bool) -> Result<()> {
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_issuer.clone());
    let token = jwt_service
        .create_token(&subject, is_admin)
        .context("Failed to create token")?;

    output(&ApiResponse::ok(TokenInfo {
        token,
        subject,
        is_admin,
    }))
}
