//! Field-level parsing for accident CSV cells.
//!
//! Each function takes a raw (untrimmed) cell and returns `None` when the
//! value cannot be interpreted; the caller decides whether that drops the
//! row or falls back to a default.

use chrono::{Datelike as _, NaiveDateTime, Timelike as _};
use lisbon_accidents_accident_models::{HOURS_PER_DAY, Month, Weekday};

/// Date-time formats accepted for `datetime` columns, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parses a coordinate. Rejects empty, non-numeric, and non-finite values.
#[must_use]
pub fn parse_coordinate(s: &str) -> Option<f64> {
    let value = s.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parses an hour of day in `0..=23`.
///
/// Accepts plain integers (`"8"`), integral floats as written by tabular
/// tools that widen integer columns (`"8.0"`), and clock times (`"08:30"`).
#[must_use]
pub fn parse_hour(s: &str) -> Option<u8> {
    let s = s.trim();
    let hour = if let Ok(h) = s.parse::<u8>() {
        h
    } else if let Some((head, _)) = s.split_once(':') {
        head.trim().parse::<u8>().ok()?
    } else {
        let f = s.parse::<f64>().ok()?;
        if f.fract() != 0.0 || !(0.0..f64::from(HOURS_PER_DAY)).contains(&f) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let h = f as u8;
        h
    };
    (hour < HOURS_PER_DAY).then_some(hour)
}

/// Parses a weekday name.
#[must_use]
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse().ok()
}

/// Parses a month name or number. Empty cells yield `None`.
#[must_use]
pub fn parse_month(s: &str) -> Option<Month> {
    s.trim().parse().ok()
}

/// Parses a casualty count, coercing anything unparsable or negative to 0.
#[must_use]
pub fn parse_count(s: &str) -> u32 {
    let s = s.trim();
    if let Ok(n) = s.parse::<u32>() {
        return n;
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let n = f.min(f64::from(u32::MAX)) as u32;
            n
        }
        _ => 0,
    }
}

/// Parses a combined date-time cell.
#[must_use]
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Decomposes a date-time into hour, weekday, and month.
#[must_use]
pub fn decompose(dt: &NaiveDateTime) -> (u8, Weekday, Month) {
    #[allow(clippy::cast_possible_truncation)]
    let hour = dt.hour() as u8;
    let weekday = Weekday::all()[dt.weekday().num_days_from_monday() as usize];
    let month = Month::all()[dt.month0() as usize];
    (hour, weekday, month)
}

/// Returns the trimmed cell, or `None` if it is empty.
#[must_use]
pub fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
