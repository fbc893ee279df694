#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter selection and aggregate result types.
//!
//! A [`FilterSelection`] describes what the user currently has selected in
//! the dashboard controls. The remaining types are the aggregate displays
//! computed over whatever rows survive that selection.

use std::collections::BTreeSet;

use lisbon_accidents_accident_models::{HOURS_PER_DAY, Month, Severity, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive hour-of-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourRange {
    /// First hour included.
    pub start: u8,
    /// Last hour included.
    pub end: u8,
}

impl HourRange {
    /// The whole day, `[0, 23]`.
    pub const FULL: Self = Self {
        start: 0,
        end: HOURS_PER_DAY - 1,
    };

    /// Creates a range, clamping both ends to `[0, 23]`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHourRangeError`] if `start > end`.
    pub fn new(start: u8, end: u8) -> Result<Self, InvalidHourRangeError> {
        let last = HOURS_PER_DAY - 1;
        let (start, end) = (start.min(last), end.min(last));
        if start > end {
            return Err(InvalidHourRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Whether `hour` lies within the range.
    #[must_use]
    pub const fn contains(self, hour: u8) -> bool {
        self.start <= hour && hour <= self.end
    }

    /// Whether the range covers the whole day.
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.start == 0 && self.end == HOURS_PER_DAY - 1
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Error returned when an hour range starts after it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHourRangeError {
    /// Requested start hour.
    pub start: u8,
    /// Requested end hour.
    pub end: u8,
}

impl std::fmt::Display for InvalidHourRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid hour range {}-{}: start must not exceed end",
            self.start, self.end
        )
    }
}

impl std::error::Error for InvalidHourRangeError {}

/// The current state of every dashboard filter control.
///
/// An empty set means "no filtering" on that attribute. For severities and
/// weekdays, selecting every value is equivalent to selecting none.
/// [`Default`] is the fully unfiltered selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    /// Severities to keep.
    pub severities: BTreeSet<Severity>,
    /// Hours to keep.
    pub hours: HourRange,
    /// Weekdays to keep.
    pub weekdays: BTreeSet<Weekday>,
    /// Months to keep.
    pub months: BTreeSet<Month>,
    /// Municipalities to keep.
    pub municipalities: BTreeSet<String>,
}

impl FilterSelection {
    /// Whether no control restricts the table.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        (self.severities.is_empty() || self.severities.len() == Severity::all().len())
            && self.hours.is_full()
            && (self.weekdays.is_empty() || self.weekdays.len() == Weekday::all().len())
            && self.months.is_empty()
            && self.municipalities.is_empty()
    }
}

/// Count for one value of a grouping attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket<K> {
    /// Group value.
    pub key: K,
    /// Number of accidents in the group.
    pub count: u64,
}

/// Weekday × hour accident counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayHourMatrix {
    /// Row labels, Monday first.
    pub weekdays: Vec<Weekday>,
    /// Column labels, 0-23.
    pub hours: Vec<u8>,
    /// `counts[weekday][hour]`.
    pub counts: Vec<Vec<u64>>,
}

/// Headline figures for the filtered accidents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    /// Number of accidents.
    pub accidents: u64,
    /// Total fatalities within 30 days.
    pub fatalities: u64,
    /// Total serious injuries within 30 days.
    pub serious_injuries: u64,
    /// Total minor injuries within 30 days.
    pub minor_injuries: u64,
}

/// Most frequent values in the filtered accidents.
///
/// Every field is `None` when nothing matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// Hour with the most accidents.
    pub peak_hour: Option<u8>,
    /// Weekday with the most accidents.
    pub top_weekday: Option<Weekday>,
    /// Most common severity.
    pub top_severity: Option<Severity>,
}

/// Where the map should be centred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapCenter {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

/// Every aggregate display for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Headline figures.
    pub kpis: Kpis,
    /// Counts per hour, all 24 buckets.
    pub by_hour: Vec<Bucket<u8>>,
    /// Counts per weekday, all 7 buckets.
    pub by_weekday: Vec<Bucket<Weekday>>,
    /// Counts per severity, all 4 buckets.
    pub by_severity: Vec<Bucket<Severity>>,
    /// Counts per month, for months present in the dataset.
    pub by_month: Vec<Bucket<Month>>,
    /// Weekday × hour grid.
    pub weekday_hour: WeekdayHourMatrix,
    /// Most frequent values.
    pub insights: Insights,
    /// Map centre.
    pub center: MapCenter,
}
