//! Current conditions from an Open-Meteo compatible forecast API.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{Cache, get_json, set_json};

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Weather response had no current conditions")]
    MissingCurrent,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    apparent_temperature: f64,
    wind_speed_10m: f64,
    weather_code: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    /// °C
    pub temperature: f64,
    pub feels_like: f64,
    /// m/s
    pub wind_speed: f64,
    /// WMO weather interpretation code
    pub weather_code: u16,
    pub label: String,
    pub fetched_at: DateTime<Utc>,
}

pub struct WeatherClient {
    client: Client,
    base_url: String,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl WeatherClient {
    pub fn new(client: Client, base_url: &str, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            ttl,
        }
    }

    pub fn cache_key(lat: f64, lon: f64) -> String {
        format!("weather:v1:{:.2},{:.2}", lat, lon)
    }

    pub async fn current(
        &self,
        lat: f64,
        lon: f64,
        timezone: Option<&str>,
    ) -> Result<CurrentWeather, WeatherError> {
        let key = Self::cache_key(lat, lon);
        if let Some(weather) = get_json::<CurrentWeather>(self.cache.as_ref(), &key).await {
            tracing::debug!("Weather cache hit for {}", key);
            return Ok(weather);
        }

        let resp: ForecastResponse = self
            .client
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                (
                    "current",
                    "temperature_2m,apparent_temperature,wind_speed_10m,weather_code".to_string(),
                ),
                ("wind_speed_unit", "ms".to_string()),
                ("timezone", timezone.unwrap_or("auto").to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let current = resp.current.ok_or(WeatherError::MissingCurrent)?;

        let weather = CurrentWeather {
            temperature: current.temperature_2m,
            feels_like: current.apparent_temperature,
            wind_speed: current.wind_speed_10m,
            weather_code: current.weather_code,
            label: weather_label(current.weather_code).to_string(),
            fetched_at: Utc::now(),
        };
        set_json(self.cache.as_ref(), &key, &weather, self.ttl).await;
        Ok(weather)
    }
}

/// Korean label for a WMO weather code
pub fn weather_label(code: u16) -> &'static str {
    match code {
        0 => "맑음",
        1 => "대체로 맑음",
        2 => "구름 조금",
        3 => "흐림",
        45 | 48 => "안개",
        51 | 53 | 55 => "이슬비",
        56 | 57 => "어는 이슬비",
        61 | 63 | 65 => "비",
        66 | 67 => "어는 비",
        71 | 73 | 75 => "눈",
        77 => "싸락눈",
        80..=82 => "소나기",
        85 | 86 => "눈 소나기",
        95 => "뇌우",
        96 | 99 => "우박을 동반한 뇌우",
        _ => "알 수 없음",
    }
}
