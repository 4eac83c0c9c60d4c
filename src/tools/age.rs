use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AgeError {
    #[error("Birth date {0} is after {1}")]
    BirthInFuture(NaiveDate, NaiveDate),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeInfo {
    pub birth_date: NaiveDate,
    pub today: NaiveDate,
    /// 만 나이
    pub international_age: i32,
    /// 세는 나이
    pub korean_age: i32,
    /// 연 나이
    pub year_age: i32,
    pub days_lived: i64,
    pub next_birthday: NaiveDate,
    pub days_until_birthday: i64,
    pub is_birthday_today: bool,
}

/// The birthday observed in `year`. Leap day birthdays are observed on
/// Feb 28th in common years.
fn birthday_in(birth: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(birth)
}

pub fn calculate(birth: NaiveDate, today: NaiveDate) -> Result<AgeInfo, AgeError> {
    if birth > today {
        return Err(AgeError::BirthInFuture(birth, today));
    }

    let year_age = today.year() - birth.year();
    let this_year = birthday_in(birth, today.year());
    let had_birthday = today >= this_year;
    let international_age = if had_birthday { year_age } else { year_age - 1 };

    let next_birthday = if had_birthday && today != this_year {
        birthday_in(birth, today.year() + 1)
    } else {
        this_year
    };

    Ok(AgeInfo {
        birth_date: birth,
        today,
        international_age,
        korean_age: year_age + 1,
        year_age,
        days_lived: (today - birth).num_days(),
        next_birthday,
        days_until_birthday: (next_birthday - today).num_days(),
        is_birthday_today: today == this_year,
    })
}
