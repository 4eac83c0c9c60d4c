//! Holiday data: the special-day feeds, their normalization and the
//! providers that merge them per month.

mod error;
mod fetcher;
mod models;
mod provider;

pub use error::HolidayError;
pub use fetcher::{HolidayFetcher, normalize_item, normalize_locdate, normalize_response};
pub use models::{HolidayItem, HolidayKind, HolidayMap, HolidaySource, group_by_date};
pub use provider::{
    CompositeHolidayProvider, ExternalHolidayProvider, HolidayProvider, korean_special_day_feeds,
    merge_maps,
};
