use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which special-day feed an item came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    Public,
    Anniversary,
    Sundry,
}

impl HolidayKind {
    pub const ALL: [HolidayKind; 3] = [
        HolidayKind::Public,
        HolidayKind::Anniversary,
        HolidayKind::Sundry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HolidayKind::Public => "public",
            HolidayKind::Anniversary => "anniversary",
            HolidayKind::Sundry => "sundry",
        }
    }

    /// Operation name on the special day info service
    pub fn operation(&self) -> &'static str {
        match self {
            HolidayKind::Public => "getRestDeInfo",
            HolidayKind::Anniversary => "getAnniversaryInfo",
            HolidayKind::Sundry => "getSundryDayInfo",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidaySource {
    External,
    Builtin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayItem {
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub name: String,
    pub source: HolidaySource,
    pub is_holiday: bool,
    pub kind: HolidayKind,
}

impl HolidayItem {
    /// Key used to collapse duplicates coming out of a single feed.
    pub fn feed_identity(&self) -> (String, String, HolidayKind) {
        (self.date.clone(), self.name.clone(), self.kind)
    }

    /// Key used to collapse duplicates across providers.
    pub fn identity(&self) -> (String, String, HolidayKind, HolidaySource) {
        (self.date.clone(), self.name.clone(), self.kind, self.source)
    }
}

/// Holidays for a month keyed by ISO date. Lists keep provider order.
pub type HolidayMap = BTreeMap<String, Vec<HolidayItem>>;

pub fn group_by_date(items: impl IntoIterator<Item = HolidayItem>) -> HolidayMap {
    let mut map = HolidayMap::new();
    for item in items {
        map.entry(item.date.clone()).or_default().push(item);
    }
    map
}
