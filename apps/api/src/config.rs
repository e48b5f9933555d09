use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a number is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub resume_ttl_minutes: i64,
    pub resume_store_capacity: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            port: env_or("PORT", 5000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            resume_ttl_minutes: env_or("RESUME_TTL_MINUTES", 60)?,
            resume_store_capacity: env_or("RESUME_STORE_CAPACITY", 256)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_setting(key, std::env::var(key).ok(), default)
}

fn parse_setting<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_setting_uses_default() {
        assert_eq!(parse_setting::<u16>("PORT", None, 5000).unwrap(), 5000);
    }

    #[test]
    fn test_setting_is_parsed() {
        let capacity = parse_setting::<usize>("RESUME_STORE_CAPACITY", Some(" 10 ".to_string()), 256);
        assert_eq!(capacity.unwrap(), 10);
    }

    #[test]
    fn test_malformed_setting_names_the_variable() {
        let err = parse_setting::<u16>("PORT", Some("eighty".to_string()), 5000).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
