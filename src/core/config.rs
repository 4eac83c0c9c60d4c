use std::env;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Rest,
}

impl CacheBackend {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "rest" | "redis" | "shared" => CacheBackend::Rest,
            _ => CacheBackend::Memory,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub holiday_api_url: String,
    // Checked on first use so the rest of the site still works without it
    pub holiday_api_key: Option<String>,
    pub holiday_cache_ttl: Duration,
    pub ip_geo_api_url: Option<String>,
    pub weather_api_url: String,
    pub weather_cache_ttl: Duration,
    pub cache_backend: CacheBackend,
    pub cache_rest_url: Option<String>,
    pub cache_rest_token: Option<String>,
    pub cache_key_prefix: String,
    pub public_site_url: String,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn secs_var(key: &str, default: u64) -> Duration {
    let secs = env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

impl Default for AppConfig {
    fn default() -> Self {
        let holiday_api_url = env::var("TOOLSHED_HOLIDAY_API_URL").unwrap_or_else(|_| {
            "https://apis.data.go.kr/B090041/openapi/service/SpcdeInfoService".to_string()
        });
        let holiday_api_key = non_empty_var("TOOLSHED_HOLIDAY_API_KEY");
        let holiday_cache_ttl = secs_var("TOOLSHED_HOLIDAY_CACHE_TTL_SECS", 60 * 60 * 12);
        let ip_geo_api_url = non_empty_var("TOOLSHED_IP_GEO_API_URL");
        let weather_api_url = env::var("TOOLSHED_WEATHER_API_URL")
            .unwrap_or_else(|_| "https://api.open-meteo.com".to_string());
        let weather_cache_ttl = secs_var("TOOLSHED_WEATHER_CACHE_TTL_SECS", 60 * 10);
        let cache_backend = env::var("TOOLSHED_CACHE_BACKEND")
            .map(|v| CacheBackend::from_env_value(&v))
            .unwrap_or(CacheBackend::Memory);
        let cache_rest_url = non_empty_var("TOOLSHED_CACHE_REST_URL");
        let cache_rest_token = non_empty_var("TOOLSHED_CACHE_REST_TOKEN");
        let cache_key_prefix =
            env::var("TOOLSHED_CACHE_KEY_PREFIX").unwrap_or_else(|_| "toolshed:".to_string());
        let public_site_url = env::var("TOOLSHED_PUBLIC_SITE_URL")
            .unwrap_or_else(|_| "http://localhost:2222".to_string());

        Self {
            holiday_api_url,
            holiday_api_key,
            holiday_cache_ttl,
            ip_geo_api_url,
            weather_api_url,
            weather_cache_ttl,
            cache_backend,
            cache_rest_url,
            cache_rest_token,
            cache_key_prefix,
            public_site_url,
        }
    }
}
