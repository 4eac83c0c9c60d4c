//! API routes module

pub mod calendar;
pub mod health;
pub mod ip;
pub mod tools;
pub mod weather;

use std::sync::Arc;

use crate::api::public::ApiError;
use crate::api::state::AppState;
use axum::Router;
use axum::http::Uri;

type SharedState = Arc<AppState>;

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Holidays, month grid and lunar conversion
        .nest("/calendar", calendar::router())
        // Caller IP and geolocation
        .nest("/ip", ip::router())
        // Current weather for the clock widget
        .nest("/weather", weather::router())
        // Age and text counters
        .nest("/tools", tools::router())
        .nest("/health", health::router())
        .fallback(not_found)
}
