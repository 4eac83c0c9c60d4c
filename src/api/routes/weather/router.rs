//! Router for the weather API

use std::sync::Arc;

use axum::{Router, extract::State, routing::get};
use axum_extra::extract::{Query, QueryRejection};

use super::public;
use crate::api::public::{ApiError, ApiJson};
use crate::api::state::AppState;
use crate::api::utils;

type SharedState = Arc<AppState>;

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn now(
    State(state): State<SharedState>,
    params: Result<Query<public::NowQuery>, QueryRejection>,
) -> Result<ApiJson<public::NowResponse>, ApiError> {
    let params = utils::query(params)?;
    let lat = utils::float_in_range("lat", &params.lat, -90.0..=90.0)?;
    let lon = utils::float_in_range("lon", &params.lon, -180.0..=180.0)?;
    let timezone = non_empty(params.timezone);

    let current = state
        .weather
        .current(lat, lon, timezone.as_deref())
        .await
        .map_err(|e| ApiError::at("weather/now", e))?;

    Ok(ApiJson(public::NowResponse {
        temperature: current.temperature,
        feels_like: current.feels_like,
        wind_speed: current.wind_speed,
        weather_code: current.weather_code,
        label: current.label,
        location_label: non_empty(params.location_label),
        timezone,
        fetched_at: current.fetched_at,
    }))
}

pub fn router() -> Router<SharedState> {
    Router::new().route("/now", get(now))
}
