//! The 24 solar terms (절기) of a Gregorian year.
//!
//! Each term is the moment the Sun's apparent ecliptic longitude
//! reaches a multiple of 15°, starting from 소한 at 285°. The longitude
//! is the Bretagnon and Simon series as given in Reingold and
//! Dershowitz, _Calendrical Calculations_, evaluated in dynamical time.
//! Times are reported in KST rounded up to the minute, the way the
//! published almanac lists them.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};

use super::{CalendarError, SolarTermItem, check_year};

pub const TERM_NAMES: [&str; 24] = [
    "소한", "대한", "입춘", "우수", "경칩", "춘분", "청명", "곡우", "입하", "소만", "망종", "하지",
    "소서", "대서", "입추", "처서", "백로", "추분", "한로", "상강", "입동", "소설", "대설", "동지",
];

const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const J2000_JD: f64 = 2_451_545.0;
const TROPICAL_YEAR_DAYS: f64 = 365.242_189;
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// (amplitude, phase °, rate °/century) of each periodic term.
const LONGITUDE_TERMS: [(f64, f64, f64); 49] = [
    (403_406.0, 270.548_61, 0.928_789_2),
    (195_207.0, 340.191_28, 35_999.137_695_8),
    (119_433.0, 63.918_54, 35_999.408_966_6),
    (112_392.0, 331.262_20, 35_998.728_738_5),
    (3_891.0, 317.843, 71_998.202_61),
    (2_819.0, 86.631, 71_998.440_3),
    (1_721.0, 240.052, 36_000.357_26),
    (660.0, 310.26, 71_997.481_2),
    (350.0, 247.23, 32_964.467_8),
    (334.0, 260.87, -19.441_0),
    (314.0, 297.82, 445_267.111_7),
    (268.0, 343.14, 45_036.884_0),
    (242.0, 166.79, 3.100_8),
    (234.0, 81.53, 22_518.443_4),
    (158.0, 3.50, -19.973_9),
    (132.0, 132.75, 65_928.934_5),
    (129.0, 182.95, 9_038.029_3),
    (114.0, 162.03, 3_034.768_4),
    (99.0, 29.8, 33_718.148),
    (93.0, 266.4, 3_034.448),
    (86.0, 249.2, -2_280.773),
    (78.0, 157.6, 29_929.992),
    (72.0, 257.8, 31_556.493),
    (68.0, 185.1, 149.588),
    (64.0, 69.9, 9_037.750),
    (46.0, 8.0, 107_997.405),
    (38.0, 197.1, -4_444.176),
    (37.0, 250.4, 151.771),
    (32.0, 65.3, 67_555.316),
    (29.0, 162.7, 31_556.080),
    (28.0, 341.5, -4_561.540),
    (27.0, 291.6, 107_996.706),
    (27.0, 98.5, 1_221.655),
    (25.0, 146.7, 62_894.167),
    (24.0, 110.0, 31_437.369),
    (21.0, 5.2, 14_578.298),
    (21.0, 342.6, -31_931.757),
    (20.0, 230.9, 34_777.243),
    (18.0, 256.1, 1_221.999),
    (17.0, 45.3, 62_894.511),
    (14.0, 242.9, -4_442.039),
    (13.0, 115.2, 107_997.909),
    (13.0, 151.8, 119.066),
    (13.0, 285.3, 16_859.071),
    (12.0, 53.3, -4.578),
    (10.0, 126.6, 26_895.292),
    (10.0, 205.7, -39.127),
    (10.0, 85.9, 12_297.536),
    (10.0, 146.1, 90_073.778),
];

fn julian_day(timestamp_secs: i64) -> f64 {
    UNIX_EPOCH_JD + timestamp_secs as f64 / 86_400.0
}

fn timestamp_secs(jd: f64) -> f64 {
    (jd - UNIX_EPOCH_JD) * 86_400.0
}

/// ΔT (TT - UT) in days for a year in the supported range.
fn ephemeris_correction(year: i32) -> f64 {
    let y = f64::from(year - 2000);
    match year {
        2051.. => {
            let y1820 = f64::from(year - 1820);
            (-20.0 + 32.0 * y1820 * y1820 / 10_000.0 + 0.5628 * f64::from(2150 - year)) / 86_400.0
        }
        2006..=2050 => (62.92 + 0.32217 * y + 0.005589 * y * y) / 86_400.0,
        1987..=2005 => {
            (63.86 + 0.3345 * y - 0.060374 * y.powi(2)
                + 0.0017275 * y.powi(3)
                + 0.000651814 * y.powi(4)
                + 0.00002373599 * y.powi(5))
                / 86_400.0
        }
        _ => {
            // Centuries from 1900-01-01 to the middle of the year
            let c = f64::from(year - 1900) / 100.0 + 181.0 / 36_525.0;
            -0.00002 + 0.000297 * c + 0.025184 * c.powi(2) - 0.181133 * c.powi(3)
                + 0.553040 * c.powi(4)
                - 0.861938 * c.powi(5)
                + 0.677066 * c.powi(6)
                - 0.212591 * c.powi(7)
        }
    }
}

/// Apparent geocentric longitude of the Sun in degrees, `[0, 360)`, at
/// `c` Julian centuries of dynamical time from J2000.
fn apparent_solar_longitude(c: f64) -> f64 {
    let series: f64 = LONGITUDE_TERMS
        .iter()
        .map(|(amplitude, phase, rate)| amplitude * (phase + rate * c).to_radians().sin())
        .sum();
    let mean = 282.777_183_4 + 36_000.769_537_44 * c + series * 0.000_005_729_577_951_308_232;
    let aberration = 0.000_097_4 * (177.63 + 35_999.018_48 * c).to_radians().cos() - 0.005_575;
    let a = 124.90 - 1_934.134 * c + 0.002_063 * c * c;
    let b = 201.11 + 72_001.537_7 * c + 0.000_57 * c * c;
    let nutation = -0.004_778 * a.to_radians().sin() - 0.000_366_7 * b.to_radians().sin();
    (mean + aberration + nutation).rem_euclid(360.0)
}

/// Signed difference `a - b` folded into `(-180, 180]`.
fn angle_delta(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Julian day (UT) at which the `index`th term of `year` occurs.
fn term_julian_day(year: i32, index: usize) -> Result<f64, CalendarError> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or(CalendarError::OutOfRange(year))?
        .and_hms_opt(0, 0, 0)
        .ok_or(CalendarError::OutOfRange(year))?
        .and_utc()
        .timestamp();
    let target = (285.0 + 15.0 * index as f64).rem_euclid(360.0);
    let delta_t = ephemeris_correction(year);

    // 소한 falls around Jan 5th and terms are ~15.2 days apart
    let mut jd = julian_day(jan_first) + 4.5 + index as f64 * TROPICAL_YEAR_DAYS / 24.0;
    for _ in 0..20 {
        let c = (jd + delta_t - J2000_JD) / 36_525.0;
        let delta = angle_delta(target, apparent_solar_longitude(c));
        jd += delta * TROPICAL_YEAR_DAYS / 360.0;
        if delta.abs() < 1e-8 {
            break;
        }
    }
    Ok(jd)
}

fn to_kst(jd: f64) -> Result<DateTime<FixedOffset>, CalendarError> {
    let kst = FixedOffset::east_opt(KST_OFFSET_SECS).ok_or(CalendarError::Conversion)?;
    let secs = (timestamp_secs(jd) / 60.0).ceil() as i64 * 60;
    let utc = DateTime::from_timestamp(secs, 0).ok_or(CalendarError::Conversion)?;
    Ok(utc.with_timezone(&kst))
}

/// All 24 terms of `year` in calendar order (소한 first, 동지 last).
pub fn solar_terms_for_year(year: i32) -> Result<Vec<SolarTermItem>, CalendarError> {
    check_year(year)?;
    TERM_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let at = to_kst(term_julian_day(year, index)?)?;
            Ok(SolarTermItem {
                name: name.to_string(),
                month: at.month(),
                day: at.day(),
                hour: at.hour(),
                minute: at.minute(),
            })
        })
        .collect()
}

/// Solar terms of one year keyed by (month, day).
#[derive(Debug, Clone, Default)]
pub struct SolarTermTable {
    by_date: HashMap<(u32, u32), SolarTermItem>,
}

impl SolarTermTable {
    pub fn for_year(year: i32) -> Result<Self, CalendarError> {
        let by_date = solar_terms_for_year(year)?
            .into_iter()
            .map(|term| ((term.month, term.day), term))
            .collect();
        Ok(Self { by_date })
    }

    pub fn get(&self, month: u32, day: u32) -> Option<&SolarTermItem> {
        self.by_date.get(&(month, day))
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
