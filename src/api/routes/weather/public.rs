//! Public types for the weather API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub timezone: Option<String>,
    pub location_label: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowResponse {
    pub temperature: f64,
    pub feels_like: f64,
    pub wind_speed: f64,
    pub weather_code: u16,
    pub label: String,
    pub location_label: Option<String>,
    pub timezone: Option<String>,
    pub fetched_at: DateTime<Utc>,
}
