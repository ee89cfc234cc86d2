/// Optional catalog extensions loaded from config.toml
pub mod catalog;

/// Database connection and schema management
pub mod database;

/// Environment-driven application settings
pub mod settings;

pub use settings::{AppConfig, AppEnvironment};
