use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::holidays::HolidayItem;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LunarDateInfo {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub is_leap_month: bool,
    /// Short display form, e.g. `1.15` or `윤 2.1`
    pub label: String,
}

/// One of the 24 solar terms. Date and time are in KST.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarTermItem {
    pub name: String,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDayCell {
    pub key: String,
    pub solar_date: NaiveDate,
    pub day: u32,
    pub in_current_month: bool,
    pub lunar: Option<LunarDateInfo>,
    pub solar_term: Option<SolarTermItem>,
    pub holidays: Vec<HolidayItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalendarMonthData {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<CalendarDayCell>>,
}
