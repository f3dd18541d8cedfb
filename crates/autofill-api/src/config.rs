//! Server configuration from the environment.

use std::time::Duration;

use axum::http::HeaderValue;
use tracing::warn;

use autofill_core::defaults::QUERY_TIMEOUT_MS;

/// Origins allowed when `ALLOWED_ORIGINS` is unset or blank.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Per-store query budget.
    pub query_timeout: Duration,
    /// Fill missing record keys once at startup.
    pub backfill_keys: bool,
    pub allowed_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    /// Read the server configuration.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` (default: `postgres://localhost/autofill`)
    /// - `HOST` (default: `0.0.0.0`), `PORT` (default: 3000)
    /// - `AUTOFILL_QUERY_TIMEOUT_MS` (default: 5000)
    /// - `AUTOFILL_BACKFILL_KEYS` (default: false)
    /// - `ALLOWED_ORIGINS`, comma-separated
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/autofill".to_string());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_or_warn("PORT", 3000u16);
        let timeout_ms = parse_or_warn("AUTOFILL_QUERY_TIMEOUT_MS", QUERY_TIMEOUT_MS);

        Self {
            database_url,
            host,
            port,
            query_timeout: Duration::from_millis(timeout_ms.max(1)),
            backfill_keys: parse_bool_env("AUTOFILL_BACKFILL_KEYS", false),
            allowed_origins: parse_allowed_origins(std::env::var("ALLOWED_ORIGINS").ok().as_deref()),
        }
    }
}

fn parse_or_warn<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match std::env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %value, default = %default, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Parses a boolean environment variable with a default fallback.
///
/// Recognizes "true", "1", "yes", "on" (case-insensitive) as true.
pub fn parse_bool_env(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(default)
}

/// Build the CORS origin whitelist.
///
/// Entries that are not valid header values are skipped with a warning.
/// Blank or missing input falls back to [`DEFAULT_ALLOWED_ORIGINS`].
pub fn parse_allowed_origins(value: Option<&str>) -> Vec<HeaderValue> {
    let origins = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => DEFAULT_ALLOWED_ORIGINS,
    };

    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origins() {
        assert_eq!(
            parse_allowed_origins(None),
            vec![HeaderValue::from_static("http://localhost:3000")]
        );
        assert_eq!(parse_allowed_origins(Some("  ")).len(), 1);
    }

    #[test]
    fn test_origin_list_skips_blanks_and_garbage() {
        let origins =
            parse_allowed_origins(Some("https://forms.example.com, ,http://localhost:5173,bad\norigin"));
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("https://forms.example.com"),
                HeaderValue::from_static("http://localhost:5173"),
            ]
        );
    }

    #[test]
    fn test_parse_bool_env() {
        std::env::set_var("AUTOFILL_TEST_BOOL_ON", "Yes");
        assert!(parse_bool_env("AUTOFILL_TEST_BOOL_ON", false));
        std::env::set_var("AUTOFILL_TEST_BOOL_OFF", "nope");
        assert!(!parse_bool_env("AUTOFILL_TEST_BOOL_OFF", true));
        assert!(parse_bool_env("AUTOFILL_TEST_BOOL_UNSET", true));
    }
}
