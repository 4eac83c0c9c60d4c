//! Solar to lunar conversion using the Korean (Dangi) calendar.

use std::ops::RangeInclusive;

use icu_calendar::Date;
use icu_calendar::cal::Dangi;

use super::{CalendarError, LunarDateInfo};

pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=2100;

pub fn check_year(year: i32) -> Result<(), CalendarError> {
    if SUPPORTED_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(CalendarError::OutOfRange(year))
    }
}

pub fn solar_to_lunar(year: i32, month: u32, day: u32) -> Result<LunarDateInfo, CalendarError> {
    check_year(year)?;
    let invalid = || CalendarError::InvalidDate { year, month, day };
    let m = u8::try_from(month).map_err(|_| invalid())?;
    let d = u8::try_from(day).map_err(|_| invalid())?;
    let iso = Date::try_new_iso(year, m, d).map_err(|_| invalid())?;

    let lunar = iso.to_calendar(Dangi::new());
    let month_info = lunar.month();
    let lunar_month = u32::from(month_info.month_number());
    let lunar_day = u32::from(lunar.day_of_month().0);
    let is_leap_month = month_info.is_leap();

    Ok(LunarDateInfo {
        year: lunar.year().era_year_or_related_iso(),
        month: lunar_month,
        day: lunar_day,
        is_leap_month,
        label: lunar_label(lunar_month, lunar_day, is_leap_month),
    })
}

fn lunar_label(month: u32, day: u32, is_leap_month: bool) -> String {
    if is_leap_month {
        format!("윤 {}.{}", month, day)
    } else {
        format!("{}.{}", month, day)
    }
}
