use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;

use crate::cache::{Cache, cache_from_config};
use crate::core::AppConfig;
use crate::holidays::{
    CompositeHolidayProvider, ExternalHolidayProvider, HolidayKind, HolidayProvider,
    korean_special_day_feeds,
};
use crate::ip::GeoClient;
use crate::weather::WeatherClient;

pub struct AppState {
    pub config: AppConfig,
    // One provider per special-day feed, shared with `holidays`
    pub feeds: HashMap<HolidayKind, Arc<ExternalHolidayProvider>>,
    pub holidays: Arc<dyn HolidayProvider>,
    pub geo: GeoClient,
    pub weather: WeatherClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let cache = cache_from_config(&config);
        Self::with_cache(config, cache)
    }

    pub fn with_cache(config: AppConfig, cache: Arc<dyn Cache>) -> Self {
        let client = Client::new();

        let registered = korean_special_day_feeds(&config, client.clone(), cache.clone());
        let holidays = CompositeHolidayProvider::from_feeds(&registered);
        let feeds = registered
            .into_iter()
            .map(|feed| (feed.kind(), feed))
            .collect();

        let geo = GeoClient::new(client.clone(), config.ip_geo_api_url.as_deref());
        let weather = WeatherClient::new(
            client,
            &config.weather_api_url,
            cache,
            config.weather_cache_ttl,
        );

        Self {
            config,
            feeds,
            holidays: Arc::new(holidays),
            geo,
            weather,
        }
    }

    pub fn feed(&self, kind: HolidayKind) -> Arc<ExternalHolidayProvider> {
        // Every kind is registered by `korean_special_day_feeds`
        self.feeds[&kind].clone()
    }
}
