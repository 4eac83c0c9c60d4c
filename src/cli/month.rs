use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;

use crate::cache::MemoryCache;
use crate::calendar::{CalendarDayCell, build_month};
use crate::core::AppConfig;
use crate::holidays::CompositeHolidayProvider;

const WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

fn describe(cell: &CalendarDayCell) -> String {
    let mut parts = vec![format!("{:>2}", cell.day)];
    if let Some(lunar) = &cell.lunar {
        parts.push(format!("(음 {})", lunar.label));
    }
    if let Some(term) = &cell.solar_term {
        parts.push(term.name.clone());
    }
    parts.extend(cell.holidays.iter().map(|h| {
        if h.is_holiday {
            format!("*{}", h.name)
        } else {
            h.name.clone()
        }
    }));
    parts.join(" ")
}

/// Print every day of the month, one per line. Holidays that are days
/// off are marked with `*`.
pub async fn run(year: i32, month: u32) -> Result<()> {
    let config = AppConfig::default();
    // A one-shot command gets nothing from a shared cache
    let provider = CompositeHolidayProvider::korean_special_days(
        &config,
        Client::new(),
        Arc::new(MemoryCache::default()),
    );
    let data = build_month(year, month, &provider).await?;

    println!("{}년 {}월", data.year, data.month);
    for (weekday, cell) in data
        .weeks
        .iter()
        .flat_map(|week| week.iter().enumerate())
        .filter(|(_, cell)| cell.in_current_month)
    {
        println!("{} {}", WEEKDAYS[weekday], describe(cell));
    }
    Ok(())
}
