#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the accidents dashboard server.
//!
//! These types are serialized to JSON for the browser view. They are kept
//! apart from the record and aggregate types so the wire contract can
//! evolve independently.

use lisbon_accidents_accident_models::{AccidentRecord, Month, Severity, Weekday};
use lisbon_accidents_analytics_models::DashboardSummary;
use lisbon_accidents_dataset::LoadReport;
use serde::{Deserialize, Serialize};

/// Message shown when a filter combination matches nothing.
pub const EMPTY_RESULT_MESSAGE: &str = "No accidents match your current filters.";

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Whether the dataset loaded successfully.
    pub dataset_loaded: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters shared by the dashboard and markers endpoints.
///
/// List parameters are comma-separated; omitted or empty lists do not
/// filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQueryParams {
    /// Comma-separated severity names.
    pub severities: Option<String>,
    /// First hour included (default 0).
    pub hour_start: Option<u8>,
    /// Last hour included (default 23).
    pub hour_end: Option<u8>,
    /// Comma-separated weekday names.
    pub weekdays: Option<String>,
    /// Comma-separated month names.
    pub months: Option<String>,
    /// Comma-separated municipality names.
    pub municipalities: Option<String>,
}

/// Domains offered by the filter controls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilterOptions {
    /// Every severity, most severe first.
    pub severities: Vec<Severity>,
    /// Weekdays present in the dataset, Monday first.
    pub weekdays: Vec<Weekday>,
    /// Months present in the dataset, in calendar order.
    pub months: Vec<Month>,
    /// Municipalities present in the dataset, sorted.
    pub municipalities: Vec<String>,
    /// Lowest selectable hour.
    pub hour_min: u8,
    /// Highest selectable hour.
    pub hour_max: u8,
    /// Number of accidents loaded.
    pub total_accidents: u64,
    /// Load statistics, including dropped rows.
    pub load_report: LoadReport,
}

/// Aggregate view of one filter selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// Number of accidents loaded.
    pub total_accidents: u64,
    /// Whether the filtered set is empty.
    pub empty: bool,
    /// Informative message for the empty state.
    pub message: Option<String>,
    /// Charts, headline figures, and map centre.
    pub summary: DashboardSummary,
}

/// Popup properties of one map marker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMarkerProperties {
    /// Accident identifier.
    pub id: String,
    /// Day of the week.
    pub weekday: Weekday,
    /// Hour of day.
    pub hour: u8,
    /// Severity classification.
    pub severity: Severity,
    /// Fatalities within 30 days.
    pub fatalities: u32,
    /// Serious injuries within 30 days.
    pub serious_injuries: u32,
    /// Minor injuries within 30 days.
    pub minor_injuries: u32,
    /// Municipality, if known.
    pub municipality: Option<String>,
    /// Marker colour for the severity.
    pub color: &'static str,
}

impl ApiMarkerProperties {
    /// Builds popup properties for `record` with the given marker colour.
    #[must_use]
    pub fn new(record: &AccidentRecord, color: &'static str) -> Self {
        Self {
            id: record.id.clone(),
            weekday: record.weekday,
            hour: record.hour,
            severity: record.severity,
            fatalities: record.injuries.fatalities,
            serious_injuries: record.injuries.serious,
            minor_injuries: record.injuries.minor,
            municipality: record.municipality.clone(),
            color,
        }
    }
}
