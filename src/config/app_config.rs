use crate::error::{AppError, Result};
use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost/api";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub listing: ListingConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub page_size: u32,
    pub cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api: ApiConfig {
                base_url: env::var("ADMIN_API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
                timeout: Duration::from_secs(parse_var("ADMIN_REQUEST_TIMEOUT_SECS", 30)?),
            },
            session: SessionConfig {
                file: env::var("ADMIN_SESSION_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_session_file()),
            },
            listing: ListingConfig {
                page_size: parse_var("ADMIN_PAGE_SIZE", 20)?,
                cache_ttl: Duration::from_secs(parse_var("ADMIN_CACHE_TTL_SECS", 60)?),
            },
        })
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            cache_ttl: Duration::from_secs(60),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    parse_setting(name, env::var(name).ok().as_deref(), default)
}

/// Unset or non-unicode values fall back to `default`.
fn parse_setting<T: std::str::FromStr>(name: &str, raw: Option<&str>, default: T) -> Result<T> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigError(format!("Invalid {} value", name))),
        None => Ok(default),
    }
}

fn default_session_file() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".shop-admin")
        .join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_parse_or_fall_back() {
        assert_eq!(parse_setting("ADMIN_PAGE_SIZE", None, 20u32).unwrap(), 20);
        assert_eq!(parse_setting("ADMIN_PAGE_SIZE", Some(" 15 "), 20u32).unwrap(), 15);
    }

    #[test]
    fn bad_setting_is_a_config_error() {
        let err = parse_setting("ADMIN_CACHE_TTL_SECS", Some("soon"), 60u64).unwrap_err();
        assert!(matches!(
            err,
            AppError::ConfigError(ref m) if m == "Invalid ADMIN_CACHE_TTL_SECS value"
        ));
    }
}
