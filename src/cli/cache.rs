use crate::cache::cache_from_config;
use crate::core::AppConfig;

/// Only meaningful for the shared REST backend; the in-memory cache
/// of a running server can't be reached from here.
pub async fn run(key: Option<String>) {
    let config = AppConfig::default();
    let cache = cache_from_config(&config);
    cache.clear(key.as_deref()).await;
    match key {
        Some(key) => println!("Cleared {}", key),
        None => println!("Cleared all entries under {}", config.cache_key_prefix),
    }
}
