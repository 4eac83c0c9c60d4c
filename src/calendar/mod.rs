//! Lunar/solar calendar: date conversion, solar terms and the month
//! grid shown on the calendar page.

mod grid;
mod lunar;
mod models;
mod solar_terms;

use thiserror::Error;

pub use grid::{
    DAYS_PER_WEEK, WEEKS_PER_GRID, build_grid, build_month, first_of_month, grid_start,
};
pub use lunar::{SUPPORTED_YEARS, check_year, solar_to_lunar};
pub use models::{CalendarDayCell, CalendarMonthData, LunarDateInfo, SolarTermItem};
pub use solar_terms::{SolarTermTable, TERM_NAMES, solar_terms_for_year};

use crate::holidays::HolidayError;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Year {0} is outside the supported range")]
    OutOfRange(i32),

    #[error("{year}-{month}-{day} is not a valid date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Date conversion failed")]
    Conversion,

    #[error(transparent)]
    Holidays(#[from] HolidayError),
}
