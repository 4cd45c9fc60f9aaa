pub mod app;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod pricing;
pub mod services;
pub mod session;
pub mod utils;

pub use app::AdminApp;
pub use client::ApiClient;
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use session::SessionStore;
