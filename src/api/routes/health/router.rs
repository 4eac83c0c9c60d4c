use std::sync::Arc;

use axum::{Router, extract::State, routing::get};
use chrono::Utc;

use super::public;
use crate::api::public::ApiJson;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

async fn health(State(state): State<SharedState>) -> ApiJson<public::HealthResponse> {
    ApiJson(public::HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        site_url: state.config.public_site_url.clone(),
    })
}

pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(health))
}
