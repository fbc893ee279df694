#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering and aggregation over the in-memory accident table.
//!
//! [`filter::apply`] turns a [`FilterSelection`] into a [`filter::Selection`]
//! of row indices without copying records, and [`aggregate::summarize`]
//! computes every chart and headline figure from that selection. Both are
//! pure functions of their inputs, so calling them again with the same
//! selection gives the same answer.
//!
//! [`FilterSelection`]: lisbon_accidents_analytics_models::FilterSelection

pub mod aggregate;
pub mod filter;

use thiserror::Error;

/// Errors from turning client input into a filter selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A categorical value is not part of the attribute's domain.
    #[error("Unknown {field} value: '{value}'")]
    UnknownValue {
        /// Filter the value was given for.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The hour range is inverted.
    #[error("{0}")]
    HourRange(#[from] lisbon_accidents_analytics_models::InvalidHourRangeError),
}
