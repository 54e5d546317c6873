use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; records are kept in memory when unset
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
    pub rate_limit: Option<RateLimit>,
}

/// Per-IP request budget enforced by tower-governor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst_size: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let rate_limit = match env::var("RATE_LIMIT_PER_SECOND").ok() {
            Some(per_second) => Some(RateLimit {
                per_second: per_second
                    .parse()
                    .context("RATE_LIMIT_PER_SECOND must be a valid number")?,
                burst_size: env::var("RATE_LIMIT_BURST")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .context("RATE_LIMIT_BURST must be a valid number")?,
            }),
            None => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a valid number")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "content-server".to_string()),
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
            rate_limit,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
