// src/config.rs
use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "change-me-in-production-please";

/// Everything the process takes from the environment, read once at
/// startup and passed around through [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    pub jwt_secret: String,
    pub allowed_origins: Vec<String>,
    pub allowed_domain: String,
    pub frontend_url: String,
}

impl Config {
    pub fn load() -> Self {
        let port: u16 = try_load("PORT", "8000");

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, falling back to an insecure default");
            DEFAULT_JWT_SECRET.to_string()
        });

        Self {
            port,
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            google_redirect_uri: env::var("GOOGLE_REDIRECT_URI")
                .unwrap_or_else(|_| format!("http://localhost:{port}/api/auth/callback")),
            jwt_secret,
            allowed_origins: parse_origins(
                &var_or("ALLOWED_ORIGINS", "http://localhost:3000,http://127.0.0.1:3000"),
            ),
            allowed_domain: var_or("ALLOWED_DOMAIN", "example.edu"),
            frontend_url: var_or("FRONTEND_URL", "http://localhost:3000"),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var_or(key, default)
        .parse()
        .map_err(|e| warn!("invalid {key} value: {e}"))
        .expect("environment misconfigured")
}

/// Split a comma-separated origin list, dropping empty entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        let origins = parse_origins("http://localhost:3000, https://example.edu ,");
        assert_eq!(
            origins,
            vec!["http://localhost:3000".to_string(), "https://example.edu".to_string()]
        );
    }

    #[test]
    fn empty_origin_list_stays_empty() {
        assert!(parse_origins("").is_empty());
        assert!(parse_origins(" , ,").is_empty());
    }
}
