//! Public types for the calendar API
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{LunarDateInfo, SolarTermItem};
use crate::holidays::{HolidayKind, HolidayMap};

/// Raw `year`/`month` query, validated in the handler
#[derive(Deserialize)]
pub struct MonthQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Deserialize)]
pub struct DateQuery {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidaysResponse {
    pub year: i32,
    pub month: u32,
    pub kind: HolidayKind,
    pub holidays: HolidayMap,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LunarResponse {
    pub solar_date: NaiveDate,
    pub lunar: LunarDateInfo,
    pub solar_term: Option<SolarTermItem>,
}
