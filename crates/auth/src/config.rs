//! Authentication configuration

use chrono::Duration;

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl AuthConfig {
    /// Config with the default lifetimes: 60 minute access, 7 day refresh
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            issuer: None,
            audience: None,
            access_token_ttl: Duration::minutes(60),
            refresh_token_ttl: Duration::days(7),
        }
    }

    pub fn from_config(config: &jobboard_common::Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            access_token_ttl: Duration::minutes(config.access_token_ttl_minutes),
            refresh_token_ttl: Duration::days(config.refresh_token_ttl_days),
        }
    }
}
