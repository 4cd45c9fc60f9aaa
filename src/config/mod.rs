mod app_config;

pub use app_config::{ApiConfig, AppConfig, DEFAULT_API_BASE_URL, ListingConfig, SessionConfig};
