//! Coercion and range checks for query string parameters. Every failure
//! is a `BAD_REQUEST`.

use std::ops::RangeInclusive;

use axum_extra::extract::{Query, QueryRejection};
use chrono::NaiveDate;

use super::public::ApiError;
use crate::calendar::SUPPORTED_YEARS;

/// Unwrap a query extraction, turning a rejection into a `BAD_REQUEST`.
pub fn query<T>(extracted: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    extracted
        .map(|Query(params)| params)
        .map_err(|e| ApiError::bad_request(format!("Invalid query string: {}", e)))
}

pub fn required<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("Missing parameter `{}`", name))),
    }
}

pub fn int_in_range(
    name: &str,
    value: &Option<String>,
    range: RangeInclusive<i64>,
) -> Result<i64, ApiError> {
    let raw = required(name, value)?;
    let parsed: i64 = raw
        .parse()
        .map_err(|_| ApiError::bad_request(format!("`{}` must be an integer", name)))?;
    if !range.contains(&parsed) {
        return Err(ApiError::bad_request(format!(
            "`{}` must be between {} and {}",
            name,
            range.start(),
            range.end()
        )));
    }
    Ok(parsed)
}

pub fn float_in_range(
    name: &str,
    value: &Option<String>,
    range: RangeInclusive<f64>,
) -> Result<f64, ApiError> {
    let raw = required(name, value)?;
    let parsed: f64 = raw
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ApiError::bad_request(format!("`{}` must be a number", name)))?;
    if !range.contains(&parsed) {
        return Err(ApiError::bad_request(format!(
            "`{}` must be between {} and {}",
            name,
            range.start(),
            range.end()
        )));
    }
    Ok(parsed)
}

pub fn year_month(year: &Option<String>, month: &Option<String>) -> Result<(i32, u32), ApiError> {
    let years = i64::from(*SUPPORTED_YEARS.start())..=i64::from(*SUPPORTED_YEARS.end());
    let year = int_in_range("year", year, years)? as i32;
    let month = int_in_range("month", month, 1..=12)? as u32;
    Ok((year, month))
}

pub fn date(name: &str, value: &Option<String>) -> Result<NaiveDate, ApiError> {
    let raw = required(name, value)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("`{}` must be a YYYY-MM-DD date", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn it_coerces_year_and_month() {
        assert_eq!(year_month(&s("2024"), &s(" 2 ")).unwrap(), (2024, 2));
        assert!(year_month(&s("1899"), &s("1")).is_err());
        assert!(year_month(&s("2024"), &s("13")).is_err());
        assert!(year_month(&s("twenty"), &s("1")).is_err());
        assert!(year_month(&None, &s("1")).is_err());
        assert!(year_month(&s("2024"), &s("")).is_err());
    }

    #[test]
    fn it_checks_float_ranges() {
        assert_eq!(float_in_range("lat", &s("37.5"), -90.0..=90.0).unwrap(), 37.5);
        assert!(float_in_range("lat", &s("91"), -90.0..=90.0).is_err());
        assert!(float_in_range("lat", &s("NaN"), -90.0..=90.0).is_err());
        assert!(float_in_range("lat", &s("north"), -90.0..=90.0).is_err());
    }

    #[test]
    fn it_parses_dates() {
        assert_eq!(
            date("birthDate", &s("1990-06-15")).unwrap(),
            NaiveDate::from_ymd_opt(1990, 6, 15).unwrap()
        );
        assert!(date("birthDate", &s("1990-6-45")).is_err());
    }
}
