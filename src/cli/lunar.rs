use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

use crate::calendar::{SolarTermTable, solar_to_lunar};

pub fn run(date: &str) -> Result<()> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date {}, expected YYYY-MM-DD", date))?;
    let lunar = solar_to_lunar(date.year(), date.month(), date.day())?;

    println!(
        "{} => 음력 {}년 {}{}월 {}일",
        date,
        lunar.year,
        if lunar.is_leap_month { "윤" } else { "" },
        lunar.month,
        lunar.day
    );
    if let Some(term) = SolarTermTable::for_year(date.year())?.get(date.month(), date.day()) {
        println!("절기: {} ({:02}:{:02} KST)", term.name, term.hour, term.minute);
    }
    Ok(())
}
