//! Month grid for the calendar page: 6 weeks of 7 days starting on a
//! Sunday, enriched with lunar dates, solar terms and holidays.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};

use super::{
    CalendarDayCell, CalendarError, CalendarMonthData, SolarTermTable, check_year, solar_to_lunar,
};
use crate::holidays::{HolidayMap, HolidayProvider};

pub const WEEKS_PER_GRID: usize = 6;
pub const DAYS_PER_WEEK: usize = 7;

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    check_year(year)?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidDate {
        year,
        month,
        day: 1,
    })
}

/// Sunday on or before the first of the month.
pub fn grid_start(first: NaiveDate) -> NaiveDate {
    first - Duration::days(i64::from(first.weekday().num_days_from_sunday()))
}

/// Fetch the month's holidays once and lay out the grid.
pub async fn build_month(
    year: i32,
    month: u32,
    provider: &dyn HolidayProvider,
) -> Result<CalendarMonthData, CalendarError> {
    let first = first_of_month(year, month)?;
    let holidays = provider.get_month(year, month).await?;
    Ok(build_grid(first, &holidays))
}

/// Lay out the grid for the month starting at `first` using an already
/// fetched holiday map.
pub fn build_grid(first: NaiveDate, holidays: &HolidayMap) -> CalendarMonthData {
    let start = grid_start(first);
    let end = start + Duration::days((WEEKS_PER_GRID * DAYS_PER_WEEK - 1) as i64);

    // One solar term table per distinct year in the grid
    let mut terms: HashMap<i32, Option<SolarTermTable>> = HashMap::new();
    for year in [start.year(), end.year()] {
        terms.entry(year).or_insert_with(|| match SolarTermTable::for_year(year) {
            Ok(table) => Some(table),
            Err(e) => {
                tracing::debug!("No solar terms for {}: {}", year, e);
                None
            }
        });
    }

    let weeks = (0..WEEKS_PER_GRID)
        .map(|week| {
            (0..DAYS_PER_WEEK)
                .map(|weekday| {
                    let date = start + Duration::days((week * DAYS_PER_WEEK + weekday) as i64);
                    build_cell(date, first, holidays, &terms)
                })
                .collect()
        })
        .collect();

    CalendarMonthData {
        year: first.year(),
        month: first.month(),
        weeks,
    }
}

fn build_cell(
    date: NaiveDate,
    first: NaiveDate,
    holidays: &HolidayMap,
    terms: &HashMap<i32, Option<SolarTermTable>>,
) -> CalendarDayCell {
    let key = date.format("%Y-%m-%d").to_string();
    let lunar = match solar_to_lunar(date.year(), date.month(), date.day()) {
        Ok(lunar) => Some(lunar),
        Err(e) => {
            tracing::debug!("Lunar conversion failed for {}: {}", key, e);
            None
        }
    };
    let solar_term = terms
        .get(&date.year())
        .and_then(Option::as_ref)
        .and_then(|table| table.get(date.month(), date.day()))
        .cloned();
    let holidays = holidays.get(&key).cloned().unwrap_or_default();

    CalendarDayCell {
        key,
        solar_date: date,
        day: date.day(),
        in_current_month: date.year() == first.year() && date.month() == first.month(),
        lunar,
        solar_term,
        holidays,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::{HolidayError, HolidayItem, HolidayKind, HolidaySource, group_by_date};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        map: HolidayMap,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HolidayProvider for CountingProvider {
        async fn get_month(&self, _year: i32, _month: u32) -> Result<HolidayMap, HolidayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.map.clone())
        }
    }

    fn cells(data: &CalendarMonthData) -> Vec<&CalendarDayCell> {
        data.weeks.iter().flatten().collect()
    }

    #[test]
    fn it_always_builds_six_full_weeks() {
        for (year, month) in [(2024, 2), (2026, 2), (2024, 6), (2025, 8), (2024, 12), (2021, 2)] {
            let first = first_of_month(year, month).unwrap();
            let data = build_grid(first, &HolidayMap::new());
            assert_eq!(data.weeks.len(), 6);
            assert!(data.weeks.iter().all(|w| w.len() == 7));

            let in_month: HashSet<u32> = cells(&data)
                .into_iter()
                .filter(|c| c.in_current_month)
                .map(|c| c.day)
                .collect();
            let days_in_month = (first + chrono::Months::new(1) - first).num_days() as u32;
            assert_eq!(in_month, (1..=days_in_month).collect::<HashSet<_>>());
            assert_eq!(
                cells(&data).iter().filter(|c| c.in_current_month).count() as u32,
                days_in_month
            );
        }
    }

    #[test]
    fn it_starts_on_sunday() {
        // 2024-09-01 is a Sunday so the grid starts on the 1st
        let data = build_grid(first_of_month(2024, 9).unwrap(), &HolidayMap::new());
        assert_eq!(data.weeks[0][0].key, "2024-09-01");

        // 2024-02-01 is a Thursday
        let data = build_grid(first_of_month(2024, 2).unwrap(), &HolidayMap::new());
        assert_eq!(data.weeks[0][0].key, "2024-01-28");
        assert!(!data.weeks[0][0].in_current_month);
        assert_eq!(data.weeks[0][4].key, "2024-02-01");
    }

    #[tokio::test]
    async fn it_enriches_cells_with_terms_lunar_dates_and_holidays() {
        let provider = CountingProvider {
            map: group_by_date(vec![HolidayItem {
                date: "2024-02-10".to_string(),
                name: "설날".to_string(),
                source: HolidaySource::External,
                is_holiday: true,
                kind: HolidayKind::Public,
            }]),
            calls: AtomicUsize::new(0),
        };

        let data = build_month(2024, 2, &provider).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let all = cells(&data);
        let ipchun = all.iter().find(|c| c.key == "2024-02-04").unwrap();
        assert_eq!(ipchun.solar_term.as_ref().unwrap().name, "입춘");
        assert!(ipchun.holidays.is_empty());

        let seollal = all.iter().find(|c| c.key == "2024-02-10").unwrap();
        assert_eq!(seollal.holidays.len(), 1);
        assert_eq!(seollal.lunar.as_ref().unwrap().label, "1.1");
    }

    #[test]
    fn it_spans_the_year_boundary() {
        // Grid for December 2024 runs into January 2025, which has 소한
        let data = build_grid(first_of_month(2024, 12).unwrap(), &HolidayMap::new());
        let all = cells(&data);
        assert_eq!(all.first().unwrap().key, "2024-12-01");
        assert_eq!(all.last().unwrap().key, "2025-01-11");
        let sohan = all.iter().find(|c| c.key == "2025-01-05").unwrap();
        assert_eq!(sohan.solar_term.as_ref().unwrap().name, "소한");
        let dongji = all.iter().find(|c| c.key == "2024-12-21").unwrap();
        assert_eq!(dongji.solar_term.as_ref().unwrap().name, "동지");
    }

    #[test]
    fn it_puts_a_term_just_before_midnight_on_that_day() {
        // 하지 2023 is at 23:58 KST on the 21st
        let data = build_grid(first_of_month(2023, 6).unwrap(), &HolidayMap::new());
        let all = cells(&data);
        let day = |key: &str| *all.iter().find(|c| c.key == key).unwrap();
        assert_eq!(day("2023-06-21").solar_term.as_ref().unwrap().name, "하지");
        assert!(day("2023-06-22").solar_term.is_none());
    }

    #[test]
    fn it_keeps_cells_when_lunar_conversion_is_unavailable() {
        // January 1900 starts the grid in December 1899, outside the
        // supported range
        let data = build_grid(first_of_month(1900, 1).unwrap(), &HolidayMap::new());
        let all = cells(&data);
        let before = all.iter().find(|c| c.key == "1899-12-31").unwrap();
        assert!(before.lunar.is_none());
        assert!(before.solar_term.is_none());
        let inside = all.iter().find(|c| c.key == "1900-01-06").unwrap();
        assert!(inside.lunar.is_some());
        assert_eq!(inside.solar_term.as_ref().unwrap().name, "소한");
    }

    #[test]
    fn it_rejects_invalid_months() {
        assert!(matches!(
            first_of_month(2024, 13),
            Err(CalendarError::InvalidDate { .. })
        ));
        assert!(matches!(first_of_month(2200, 1), Err(CalendarError::OutOfRange(2200))));
    }
}
