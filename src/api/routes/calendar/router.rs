//! Router for the calendar API

use std::sync::Arc;

use axum::{Router, extract::State};
use axum_extra::extract::{Query, QueryRejection};
use chrono::{NaiveDate, Utc};

use super::public;
use crate::api::public::{ApiError, ApiJson};
use crate::api::state::AppState;
use crate::api::utils;
use crate::calendar::{CalendarError, CalendarMonthData, SolarTermTable, build_month, solar_to_lunar};
use crate::holidays::{HolidayKind, HolidayProvider};

type SharedState = Arc<AppState>;

async fn feed_month(
    state: SharedState,
    kind: HolidayKind,
    endpoint: &'static str,
    params: public::MonthQuery,
) -> Result<ApiJson<public::HolidaysResponse>, ApiError> {
    let (year, month) = utils::year_month(&params.year, &params.month)?;
    let holidays = state
        .feed(kind)
        .get_month(year, month)
        .await
        .map_err(|e| ApiError::at(endpoint, e))?;

    Ok(ApiJson(public::HolidaysResponse {
        year,
        month,
        kind,
        holidays,
        fetched_at: Utc::now(),
    }))
}

async fn public_holidays(
    State(state): State<SharedState>,
    params: Result<Query<public::MonthQuery>, QueryRejection>,
) -> Result<ApiJson<public::HolidaysResponse>, ApiError> {
    let params = utils::query(params)?;
    feed_month(state, HolidayKind::Public, "calendar/holidays", params).await
}

async fn anniversaries(
    State(state): State<SharedState>,
    params: Result<Query<public::MonthQuery>, QueryRejection>,
) -> Result<ApiJson<public::HolidaysResponse>, ApiError> {
    let params = utils::query(params)?;
    feed_month(state, HolidayKind::Anniversary, "calendar/anniversaries", params).await
}

async fn sundry_days(
    State(state): State<SharedState>,
    params: Result<Query<public::MonthQuery>, QueryRejection>,
) -> Result<ApiJson<public::HolidaysResponse>, ApiError> {
    let params = utils::query(params)?;
    feed_month(state, HolidayKind::Sundry, "calendar/sundry", params).await
}

/// Full 6 week grid with lunar dates, solar terms and merged holidays
async fn month_grid(
    State(state): State<SharedState>,
    params: Result<Query<public::MonthQuery>, QueryRejection>,
) -> Result<ApiJson<CalendarMonthData>, ApiError> {
    let params = utils::query(params)?;
    let (year, month) = utils::year_month(&params.year, &params.month)?;
    let data = build_month(year, month, state.holidays.as_ref())
        .await
        .map_err(|e| ApiError::at("calendar/month", e))?;
    Ok(ApiJson(data))
}

async fn lunar_date(
    params: Result<Query<public::DateQuery>, QueryRejection>,
) -> Result<ApiJson<public::LunarResponse>, ApiError> {
    let params = utils::query(params)?;
    let (year, month) = utils::year_month(&params.year, &params.month)?;
    let day = utils::int_in_range("day", &params.day, 1..=31)? as u32;
    let solar_date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ApiError::at("calendar/lunar", CalendarError::InvalidDate { year, month, day })
    })?;

    let lunar = solar_to_lunar(year, month, day).map_err(|e| ApiError::at("calendar/lunar", e))?;
    let solar_term = SolarTermTable::for_year(year)
        .map_err(|e| ApiError::at("calendar/lunar", e))?
        .get(month, day)
        .cloned();

    Ok(ApiJson(public::LunarResponse {
        solar_date,
        lunar,
        solar_term,
    }))
}

/// Create the calendar router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/holidays", axum::routing::get(public_holidays))
        .route("/anniversaries", axum::routing::get(anniversaries))
        .route("/sundry", axum::routing::get(sundry_days))
        .route("/month", axum::routing::get(month_grid))
        .route("/lunar", axum::routing::get(lunar_date))
}
