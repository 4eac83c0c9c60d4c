mod config;
pub use config::{AppConfig, CacheBackend};
