#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Accident record type and categorical domains.
//!
//! This crate defines the shape of one road-accident record as held in
//! memory after loading, plus the small fixed domains (severity, weekday,
//! month) that the dashboard filters and groups by. The derived `Ord` on
//! each enum is the canonical display order used by every chart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: u8 = 24;

/// Severity classification of an accident, most severe first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Severity {
    /// At least one fatality within 30 days.
    #[strum(to_string = "Fatal")]
    Fatal,
    /// At least one serious injury within 30 days.
    #[strum(to_string = "Serious", serialize = "Severe")]
    Serious,
    /// At least one minor injury within 30 days.
    #[strum(to_string = "Minor", serialize = "Light")]
    Minor,
    /// No injuries recorded.
    #[serde(rename = "No injury")]
    #[strum(to_string = "No injury", serialize = "None", serialize = "NoInjury")]
    NoInjury,
}

impl Severity {
    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Fatal, Self::Serious, Self::Minor, Self::NoInjury]
    }

    /// Derives a severity from 30-day injury counts.
    ///
    /// Fatal if any fatality, else Serious if any serious injury, else
    /// Minor if any minor injury, else No injury.
    #[must_use]
    pub const fn from_injuries(injuries: &InjuryCounts) -> Self {
        if injuries.fatalities > 0 {
            Self::Fatal
        } else if injuries.serious > 0 {
            Self::Serious
        } else if injuries.minor > 0 {
            Self::Minor
        } else {
            Self::NoInjury
        }
    }
}

/// Day of the week, Monday first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Weekday {
    #[strum(
        to_string = "Monday",
        serialize = "Mon",
        serialize = "Segunda",
        serialize = "Segunda-feira"
    )]
    Monday,
    #[strum(
        to_string = "Tuesday",
        serialize = "Tue",
        serialize = "Terça",
        serialize = "Terça-feira",
        serialize = "Terca",
        serialize = "Terca-feira"
    )]
    Tuesday,
    #[strum(
        to_string = "Wednesday",
        serialize = "Wed",
        serialize = "Quarta",
        serialize = "Quarta-feira"
    )]
    Wednesday,
    #[strum(
        to_string = "Thursday",
        serialize = "Thu",
        serialize = "Quinta",
        serialize = "Quinta-feira"
    )]
    Thursday,
    #[strum(
        to_string = "Friday",
        serialize = "Fri",
        serialize = "Sexta",
        serialize = "Sexta-feira"
    )]
    Friday,
    #[strum(
        to_string = "Saturday",
        serialize = "Sat",
        serialize = "Sábado",
        serialize = "Sabado"
    )]
    Saturday,
    #[strum(to_string = "Sunday", serialize = "Sun", serialize = "Domingo")]
    Sunday,
}

impl Weekday {
    /// Returns all seven days, Monday first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }

    /// Zero-based index from Monday.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Calendar month.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Month {
    #[strum(to_string = "Jan", serialize = "January", serialize = "1", serialize = "01")]
    Jan,
    #[strum(to_string = "Feb", serialize = "February", serialize = "2", serialize = "02")]
    Feb,
    #[strum(to_string = "Mar", serialize = "March", serialize = "3", serialize = "03")]
    Mar,
    #[strum(to_string = "Apr", serialize = "April", serialize = "4", serialize = "04")]
    Apr,
    #[strum(to_string = "May", serialize = "5", serialize = "05")]
    May,
    #[strum(to_string = "Jun", serialize = "June", serialize = "6", serialize = "06")]
    Jun,
    #[strum(to_string = "Jul", serialize = "July", serialize = "7", serialize = "07")]
    Jul,
    #[strum(to_string = "Aug", serialize = "August", serialize = "8", serialize = "08")]
    Aug,
    #[strum(
        to_string = "Sep",
        serialize = "Sept",
        serialize = "September",
        serialize = "9",
        serialize = "09"
    )]
    Sep,
    #[strum(to_string = "Oct", serialize = "October", serialize = "10")]
    Oct,
    #[strum(to_string = "Nov", serialize = "November", serialize = "11")]
    Nov,
    #[strum(to_string = "Dec", serialize = "December", serialize = "12")]
    Dec,
}

impl Month {
    /// Returns all twelve months in calendar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Jan,
            Self::Feb,
            Self::Mar,
            Self::Apr,
            Self::May,
            Self::Jun,
            Self::Jul,
            Self::Aug,
            Self::Sep,
            Self::Oct,
            Self::Nov,
            Self::Dec,
        ]
    }
}

/// Casualty counts recorded 30 days after the accident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryCounts {
    /// Fatalities within 30 days.
    pub fatalities: u32,
    /// Serious injuries within 30 days.
    pub serious: u32,
    /// Minor injuries within 30 days.
    pub minor: u32,
}

/// One accident as held in memory for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentRecord {
    /// Source identifier, or the 1-based data row number when the file has
    /// no `id` column.
    pub id: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Day of the week.
    pub weekday: Weekday,
    /// Calendar month, if the file records one.
    pub month: Option<Month>,
    /// Municipality name, if the file records one.
    pub municipality: Option<String>,
    /// Severity classification.
    pub severity: Severity,
    /// 30-day casualty counts.
    pub injuries: InjuryCounts,
    /// Remaining columns, passed through untouched.
    pub extra: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_aliases_parse() {
        assert_eq!("Severe".parse::<Severity>().unwrap(), Severity::Serious);
        assert_eq!("light".parse::<Severity>().unwrap(), Severity::Minor);
        assert_eq!("No injury".parse::<Severity>().unwrap(), Severity::NoInjury);
        assert_eq!("FATAL".parse::<Severity>().unwrap(), Severity::Fatal);
        assert!("Catastrophic".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_display_uses_canonical_names() {
        let names: Vec<String> = Severity::all().iter().map(ToString::to_string).collect();
        assert_eq!(names, ["Fatal", "Serious", "Minor", "No injury"]);
    }

    #[test]
    fn severity_derivation_prefers_worst_injury() {
        let derive = |fatalities, serious, minor| {
            Severity::from_injuries(&InjuryCounts {
                fatalities,
                serious,
                minor,
            })
        };
        assert_eq!(derive(1, 3, 2), Severity::Fatal);
        assert_eq!(derive(0, 1, 5), Severity::Serious);
        assert_eq!(derive(0, 0, 1), Severity::Minor);
        assert_eq!(derive(0, 0, 0), Severity::NoInjury);
    }

    #[test]
    fn weekday_parses_english_and_portuguese() {
        assert_eq!("Mon".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("friday".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert_eq!("Sábado".parse::<Weekday>().unwrap(), Weekday::Saturday);
        assert_eq!("domingo".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("Funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn weekday_index_matches_order() {
        for (i, day) in Weekday::all().iter().enumerate() {
            assert_eq!(day.index(), i);
        }
    }

    #[test]
    fn month_parses_names_and_numbers() {
        assert_eq!("Jan".parse::<Month>().unwrap(), Month::Jan);
        assert_eq!("september".parse::<Month>().unwrap(), Month::Sep);
        assert_eq!("12".parse::<Month>().unwrap(), Month::Dec);
        assert_eq!("07".parse::<Month>().unwrap(), Month::Jul);
        assert!("13".parse::<Month>().is_err());
    }

    #[test]
    fn enums_order_canonically() {
        let mut months = vec![Month::Dec, Month::Jan, Month::Jun];
        months.sort();
        assert_eq!(months, [Month::Jan, Month::Jun, Month::Dec]);
        assert!(Severity::Fatal < Severity::NoInjury);
        assert!(Weekday::Monday < Weekday::Sunday);
    }
}
