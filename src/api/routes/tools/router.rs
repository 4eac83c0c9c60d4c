//! Router for the tools API

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{
    Json, Router,
    routing::{get, post},
};
use axum_extra::extract::{Query, QueryRejection};
use chrono::{TimeDelta, Utc};

use super::public;
use crate::api::public::{ApiError, ApiJson};
use crate::api::state::AppState;
use crate::api::utils;
use crate::tools::age::{self, AgeInfo};
use crate::tools::text::{self, TextCount};

type SharedState = Arc<AppState>;

const KST_OFFSET_HOURS: i64 = 9;

async fn age_handler(
    params: Result<Query<public::AgeQuery>, QueryRejection>,
) -> Result<ApiJson<AgeInfo>, ApiError> {
    let params = utils::query(params)?;
    let birth = utils::date("birthDate", &params.birth_date)?;
    let today = match params.today {
        Some(_) => utils::date("today", &params.today)?,
        None => (Utc::now() + TimeDelta::hours(KST_OFFSET_HOURS)).date_naive(),
    };
    let info = age::calculate(birth, today).map_err(|e| ApiError::at("tools/age", e))?;
    Ok(ApiJson(info))
}

async fn text_count_handler(
    body: Result<Json<public::TextCountRequest>, JsonRejection>,
) -> Result<ApiJson<TextCount>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;
    Ok(ApiJson(text::count(&body.text)))
}

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/age", get(age_handler))
        .route("/text-count", post(text_count_handler))
}
