//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Token signing
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,

    /// Uploaded media (company logos)
    pub media_root: String,
    pub media_base_url: String,

    /// Comma-separated list of allowed CORS origins; empty means permissive
    pub cors_allowed_origins: Vec<String>,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?,
            jwt_issuer: env::var("JWT_ISSUER").ok().filter(|v| !v.is_empty()),
            jwt_audience: env::var("JWT_AUDIENCE").ok().filter(|v| !v.is_empty()),
            access_token_ttl_minutes: parse_or("ACCESS_TOKEN_TTL_MINUTES", 60),
            refresh_token_ttl_days: parse_or("REFRESH_TOKEN_TTL_DAYS", 7),

            media_root: env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string()),
            media_base_url: env::var("MEDIA_BASE_URL").unwrap_or_else(|_| "/media".to_string()),

            cors_allowed_origins: split_origins(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            ),

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "jobboard=debug".to_string()),
            port: parse_or("PORT", 3000),
        };

        Ok(config)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
