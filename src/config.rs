//! Application Configuration
//! Mission: Process-wide settings from environment variables

use crate::auth::jwt::DEFAULT_TTL_SECS;

pub const APP_NAME: &str = "Sentigate ML Serving API";

/// Application configuration, read once at startup.
///
/// The signing secret and bcrypt cost live here so they can be injected into
/// the token service and hasher constructors; request-handling code never
/// reaches for the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub model_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .unwrap_or(8000);

        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());

        let token_ttl_secs = std::env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_TTL_SECS);

        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(bcrypt::DEFAULT_COST);

        let model_name = std::env::var("MODEL_NAME")
            .unwrap_or_else(|_| "lexicon-sentiment-v1".to_string());

        Self {
            host,
            port,
            jwt_secret,
            token_ttl_secs,
            bcrypt_cost,
            model_name,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
