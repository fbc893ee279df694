#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Loads the accident CSV into an immutable in-memory table.
//!
//! The table is built once at startup and only ever read afterwards.
//! Rows that cannot be mapped to an [`AccidentRecord`] (bad coordinates,
//! unparsable time fields, unknown severity labels) are dropped and
//! tallied in a [`LoadReport`] instead of failing the whole load. A
//! missing or unreadable file, or one without the required columns, is a
//! [`DatasetError`].

pub mod bounds;
pub mod parsing;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use lisbon_accidents_accident_models::{AccidentRecord, InjuryCounts, Month, Severity, Weekday};
use serde::Serialize;
use strum_macros::Display;

/// Errors that make the dataset unavailable.
///
/// Every variant is fatal for the session: the dashboard shows the message
/// and does not retry.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file does not exist.
    #[error("Dataset file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// I/O error while reading the file.
    #[error("I/O error reading dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV framing itself could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no header row.
    #[error("Dataset has no header row")]
    EmptyHeader,

    /// A column required to place or classify accidents is absent.
    #[error("Dataset is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },
}

/// Why a data row was left out of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum DropReason {
    /// Latitude or longitude missing or not a finite number.
    InvalidCoordinates,
    /// Hour missing or outside 0-23.
    InvalidHour,
    /// Weekday missing or not a recognised day name.
    InvalidWeekday,
    /// Date-time column present but unparsable.
    InvalidDateTime,
    /// Severity label not in the known domain.
    InvalidSeverity,
    /// The CSV reader rejected the row (e.g. invalid UTF-8).
    Unreadable,
}

/// Summary of a completed load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Data rows read from the file (header excluded).
    pub rows_read: u64,
    /// Rows kept in the table.
    pub rows_loaded: u64,
    /// Dropped rows, by reason.
    pub dropped: BTreeMap<DropReason, u64>,
    /// Kept rows whose coordinates fall outside the Lisbon district.
    pub outside_lisbon: u64,
}

impl LoadReport {
    /// Total number of dropped rows.
    #[must_use]
    pub fn dropped_total(&self) -> u64 {
        self.dropped.values().sum()
    }

    fn record_drop(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }
}

/// The full set of accident records, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct AccidentTable {
    records: Vec<AccidentRecord>,
    report: LoadReport,
}

impl AccidentTable {
    /// Builds a table directly from records, e.g. for tests or fixtures.
    #[must_use]
    pub fn from_records(records: Vec<AccidentRecord>) -> Self {
        let outside_lisbon = records
            .iter()
            .filter(|r| !bounds::within_lisbon(r.latitude, r.longitude))
            .count() as u64;
        let count = records.len() as u64;
        Self {
            records,
            report: LoadReport {
                rows_read: count,
                rows_loaded: count,
                dropped: BTreeMap::new(),
                outside_lisbon,
            },
        }
    }

    /// All records, in file order.
    #[must_use]
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// The record at row index `idx`.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&AccidentRecord> {
        self.records.get(idx)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Report from the load that produced this table.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Weekdays that occur in the table, Monday first.
    #[must_use]
    pub fn weekdays(&self) -> BTreeSet<Weekday> {
        self.records.iter().map(|r| r.weekday).collect()
    }

    /// Months that occur in the table, in calendar order.
    #[must_use]
    pub fn months(&self) -> BTreeSet<Month> {
        self.records.iter().filter_map(|r| r.month).collect()
    }

    /// Distinct municipality names, sorted.
    #[must_use]
    pub fn municipalities(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .filter_map(|r| r.municipality.as_deref())
            .collect()
    }
}

/// Where hour/weekday/month come from for each row.
#[derive(Debug, Clone, Copy)]
enum TimeSource {
    /// Dedicated columns.
    Columns { hour: usize, weekday: usize },
    /// A single combined date-time column.
    DateTime(usize),
    /// Separate date and time columns, joined with a space before parsing.
    DateAndTime { date: usize, time: usize },
}

/// Header positions resolved once per file.
#[derive(Debug, Clone)]
struct ColumnMap {
    id: Option<usize>,
    latitude: usize,
    longitude: usize,
    time: TimeSource,
    /// Kept alongside [`TimeSource::Columns`] to fill in the month.
    datetime: Option<usize>,
    month: Option<usize>,
    municipality: Option<usize>,
    severity: Option<usize>,
    fatalities: Option<usize>,
    serious: Option<usize>,
    minor: Option<usize>,
    /// Pass-through columns as (index, header).
    extra: Vec<(usize, String)>,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Result<Self, DatasetError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| DatasetError::MissingColumn {
                column: names[0].to_owned(),
            })
        };

        let latitude = require(&["latitude", "lat"])?;
        let longitude = require(&["longitude", "lon", "lng"])?;

        let datetime = find(&["datetime", "date_time", "timestamp"]);
        let date = find(&["date"]);
        let time_col = find(&["time"]);
        let time = match (find(&["hour"]), find(&["weekday"]), datetime, date, time_col) {
            (Some(hour), Some(weekday), ..) => TimeSource::Columns { hour, weekday },
            (_, _, Some(dt), ..) => TimeSource::DateTime(dt),
            (_, _, None, Some(date), Some(time)) => TimeSource::DateAndTime { date, time },
            (None, ..) => {
                return Err(DatasetError::MissingColumn {
                    column: "hour".to_owned(),
                });
            }
            (Some(_), None, ..) => {
                return Err(DatasetError::MissingColumn {
                    column: "weekday".to_owned(),
                });
            }
        };

        let mut map = Self {
            id: find(&["id"]),
            latitude,
            longitude,
            time,
            datetime,
            month: find(&["month"]),
            municipality: find(&["municipality"]),
            severity: find(&["severity"]),
            fatalities: find(&["fatalities_30d"]),
            serious: find(&["serious_injuries_30d"]),
            minor: find(&["minor_injuries_30d"]),
            extra: Vec::new(),
        };

        let consumed = map.consumed();
        map.extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !consumed.contains(i))
            .map(|(i, h)| (i, h.clone()))
            .collect();

        Ok(map)
    }

    fn consumed(&self) -> BTreeSet<usize> {
        let mut set: BTreeSet<usize> = [
            self.id,
            self.datetime,
            self.month,
            self.municipality,
            self.severity,
            self.fatalities,
            self.serious,
            self.minor,
        ]
        .into_iter()
        .flatten()
        .collect();
        set.insert(self.latitude);
        set.insert(self.longitude);
        match self.time {
            TimeSource::Columns { hour, weekday } => {
                set.insert(hour);
                set.insert(weekday);
            }
            TimeSource::DateTime(dt) => {
                set.insert(dt);
            }
            TimeSource::DateAndTime { date, time } => {
                set.insert(date);
                set.insert(time);
            }
        }
        set
    }

    /// Maps one data row to a record. `row_number` is 1-based.
    fn parse_row(
        &self,
        record: &StringRecord,
        row_number: u64,
    ) -> Result<AccidentRecord, DropReason> {
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let opt_cell = |idx: Option<usize>| idx.map_or("", cell);

        let latitude =
            parsing::parse_coordinate(cell(self.latitude)).ok_or(DropReason::InvalidCoordinates)?;
        let longitude = parsing::parse_coordinate(cell(self.longitude))
            .ok_or(DropReason::InvalidCoordinates)?;

        let (hour, weekday, derived_month) = match self.time {
            TimeSource::Columns { hour, weekday } => {
                let hour = parsing::parse_hour(cell(hour)).ok_or(DropReason::InvalidHour)?;
                let weekday =
                    parsing::parse_weekday(cell(weekday)).ok_or(DropReason::InvalidWeekday)?;
                let month = parsing::non_empty(opt_cell(self.datetime))
                    .and_then(parsing::parse_datetime)
                    .map(|dt| parsing::decompose(&dt).2);
                (hour, weekday, month)
            }
            TimeSource::DateTime(idx) => {
                let dt =
                    parsing::parse_datetime(cell(idx)).ok_or(DropReason::InvalidDateTime)?;
                let (h, w, m) = parsing::decompose(&dt);
                (h, w, Some(m))
            }
            TimeSource::DateAndTime { date, time } => {
                let joined = format!("{} {}", cell(date).trim(), cell(time).trim());
                let dt = parsing::parse_datetime(&joined).ok_or(DropReason::InvalidDateTime)?;
                let (h, w, m) = parsing::decompose(&dt);
                (h, w, Some(m))
            }
        };

        let injuries = InjuryCounts {
            fatalities: parsing::parse_count(opt_cell(self.fatalities)),
            serious: parsing::parse_count(opt_cell(self.serious)),
            minor: parsing::parse_count(opt_cell(self.minor)),
        };

        let severity = match parsing::non_empty(opt_cell(self.severity)) {
            Some(label) => label
                .parse::<Severity>()
                .map_err(|_| DropReason::InvalidSeverity)?,
            None => Severity::from_injuries(&injuries),
        };

        let month = parsing::non_empty(opt_cell(self.month))
            .and_then(parsing::parse_month)
            .or(derived_month);

        let id = parsing::non_empty(opt_cell(self.id))
            .map_or_else(|| row_number.to_string(), ToOwned::to_owned);

        let extra = self
            .extra
            .iter()
            .map(|(i, h)| (h.clone(), cell(*i).trim().to_owned()))
            .collect();

        Ok(AccidentRecord {
            id,
            latitude,
            longitude,
            hour,
            weekday,
            month,
            municipality: parsing::non_empty(opt_cell(self.municipality)).map(ToOwned::to_owned),
            severity,
            injuries,
            extra,
        })
    }
}

/// Reads accident CSV files into an [`AccidentTable`].
#[derive(Debug, Clone)]
pub struct CsvLoader {
    /// Field delimiter byte (defaults to `,`).
    delimiter: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    /// Creates a comma-delimited loader.
    #[must_use]
    pub const fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Sets the field delimiter (e.g. `b';'`).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Loads the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotFound`] if the file does not exist, or any
    /// other [`DatasetError`] if it cannot be read or lacks required columns.
    pub fn load_path(&self, path: &Path) -> Result<AccidentTable, DatasetError> {
        log::info!("Loading accident dataset from {}", path.display());
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DatasetError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DatasetError::Io(e)
            }
        })?;
        self.load_reader(file)
    }

    /// Loads CSV data from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the header cannot be read, required
    /// columns are missing, or the underlying reader fails.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<AccidentTable, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_owned())
            .collect();

        if headers.iter().all(String::is_empty) {
            return Err(DatasetError::EmptyHeader);
        }

        let columns = ColumnMap::resolve(&headers)?;
        log::debug!("Resolved dataset columns: {columns:?}");

        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for (i, result) in reader.records().enumerate() {
            report.rows_read += 1;
            let row_number = i as u64 + 1;

            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(DatasetError::Csv(e)),
                Err(e) => {
                    log::debug!("Skipping unreadable row {row_number}: {e}");
                    report.record_drop(DropReason::Unreadable);
                    continue;
                }
            };

            match columns.parse_row(&record, row_number) {
                Ok(accident) => {
                    if !bounds::within_lisbon(accident.latitude, accident.longitude) {
                        report.outside_lisbon += 1;
                    }
                    records.push(accident);
                }
                Err(reason) => {
                    log::trace!("Dropping row {row_number}: {reason}");
                    report.record_drop(reason);
                }
            }
        }

        report.rows_loaded = records.len() as u64;

        log::info!(
            "Loaded {} accidents ({} rows read)",
            report.rows_loaded,
            report.rows_read
        );
        if report.dropped_total() > 0 {
            log::warn!(
                "Dropped {} malformed rows: {:?}",
                report.dropped_total(),
                report.dropped
            );
        }
        if report.outside_lisbon > 0 {
            log::warn!(
                "{} accidents lie outside the Lisbon district bounds",
                report.outside_lisbon
            );
        }

        Ok(AccidentTable { records, report })
    }
}

/// Loads a comma-delimited accident CSV from `path`.
///
/// # Errors
///
/// See [`CsvLoader::load_path`].
pub fn load_csv(path: &Path) -> Result<AccidentTable, DatasetError> {
    CsvLoader::new().load_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,latitude,longitude,hour,weekday,month,municipality,fatalities_30d,serious_injuries_30d,minor_injuries_30d,road_type
1,38.72,-9.14,8,Mon,Jan,Lisboa,0,0,1,Urban
2,38.75,-9.15,8,Mon,Feb,Lisboa,0,1,0,Highway
3,38.70,-9.20,22,Fri,Feb,Oeiras,1,0,0,Urban
";

    fn load(csv: &str) -> Result<AccidentTable, DatasetError> {
        CsvLoader::new().load_reader(csv.as_bytes())
    }

    #[test]
    fn loads_well_formed_rows() {
        let table = load(SAMPLE).unwrap();
        assert_eq!(table.len(), 3);
        let first = table.get(0).unwrap();
        assert_eq!(first.id, "1");
        assert_eq!(first.hour, 8);
        assert_eq!(first.weekday, Weekday::Monday);
        assert_eq!(first.month, Some(Month::Jan));
        assert_eq!(first.municipality.as_deref(), Some("Lisboa"));
        assert_eq!(first.severity, Severity::Minor);
        assert_eq!(first.extra.get("road_type").map(String::as_str), Some("Urban"));
        assert_eq!(table.get(1).unwrap().severity, Severity::Serious);
        assert_eq!(table.get(2).unwrap().severity, Severity::Fatal);
        assert_eq!(table.report().dropped_total(), 0);
    }

    #[test]
    fn drops_non_numeric_latitude_and_keeps_the_rest() {
        let csv = "\
latitude,longitude,hour,weekday
38.72,-9.14,8,Mon
north,-9.15,9,Tue
38.70,-9.20,22,Fri
";
        let table = load(csv).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).unwrap().hour, 8);
        assert_eq!(table.get(1).unwrap().hour, 22);
        assert_eq!(table.report().rows_read, 3);
        assert_eq!(
            table.report().dropped.get(&DropReason::InvalidCoordinates),
            Some(&1)
        );
    }

    #[test]
    fn drops_rows_with_bad_time_fields() {
        let csv = "\
latitude,longitude,hour,weekday
38.72,-9.14,25,Mon
38.72,-9.14,8,Someday
38.72,-9.14,,Mon
38.72,-9.14,7,Sun
";
        let table = load(csv).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.report().dropped.get(&DropReason::InvalidHour), Some(&2));
        assert_eq!(table.report().dropped.get(&DropReason::InvalidWeekday), Some(&1));
    }

    #[test]
    fn uses_severity_column_when_present() {
        let csv = "\
latitude,longitude,hour,weekday,severity
38.72,-9.14,8,Mon,Light
38.72,-9.14,8,Mon,Severe
38.72,-9.14,22,Fri,Severe
38.72,-9.14,22,Fri,Apocalyptic
";
        let table = load(csv).unwrap();
        let severities: Vec<Severity> = table.records().iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            [Severity::Minor, Severity::Serious, Severity::Serious]
        );
        assert_eq!(
            table.report().dropped.get(&DropReason::InvalidSeverity),
            Some(&1)
        );
    }

    #[test]
    fn derives_time_fields_from_datetime_column() {
        let csv = "\
latitude,longitude,datetime
38.72,-9.14,2023-03-17 22:15:00
38.72,-9.14,not a date
";
        let table = load(csv).unwrap();
        assert_eq!(table.len(), 1);
        let r = table.get(0).unwrap();
        assert_eq!((r.hour, r.weekday, r.month), (22, Weekday::Friday, Some(Month::Mar)));
        assert_eq!(
            table.report().dropped.get(&DropReason::InvalidDateTime),
            Some(&1)
        );
    }

    #[test]
    fn joins_separate_date_and_time_columns() {
        let csv = "\
latitude;longitude;date;time
38.72;-9.14;2023-01-02;07:30
";
        let table = CsvLoader::new()
            .with_delimiter(b';')
            .load_reader(csv.as_bytes())
            .unwrap();
        let r = table.get(0).unwrap();
        assert_eq!((r.hour, r.weekday), (7, Weekday::Monday));
    }

    #[test]
    fn missing_coordinate_column_is_fatal() {
        let err = load("longitude,hour,weekday\n-9.14,8,Mon\n").unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { ref column } if column == "latitude"));
    }

    #[test]
    fn missing_time_columns_is_fatal() {
        let err = load("latitude,longitude\n38.7,-9.1\n").unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { ref column } if column == "hour"));

        let err = load("latitude,longitude,hour\n38.7,-9.1,3\n").unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { ref column } if column == "weekday"));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = load("").unwrap_err();
        assert!(matches!(err, DatasetError::EmptyHeader));
    }

    #[test]
    fn drops_rows_that_are_not_utf8() {
        let mut bytes = b"latitude,longitude,hour,weekday\n38.72,-9.14,8,Mon\n".to_vec();
        bytes.extend_from_slice(b"38.72,-9.14,\xff\xfe,Tue\n");
        bytes.extend_from_slice(b"38.70,-9.20,22,Fri\n");
        let table = CsvLoader::new().load_reader(bytes.as_slice()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.report().rows_read, 3);
        assert_eq!(table.report().dropped.get(&DropReason::Unreadable), Some(&1));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_csv(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound { .. }));
    }

    #[test]
    fn assigns_row_numbers_when_id_column_absent() {
        let csv = "latitude,longitude,hour,weekday\n38.7,-9.1,1,Mon\n38.7,-9.1,2,Tue\n";
        let table = load(csv).unwrap();
        let ids: Vec<&str> = table.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn counts_rows_outside_lisbon_without_dropping() {
        let csv = "latitude,longitude,hour,weekday\n41.15,-8.63,1,Mon\n38.72,-9.14,2,Tue\n";
        let table = load(csv).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.report().outside_lisbon, 1);
    }

    #[test]
    fn reports_distinct_domains() {
        let table = load(SAMPLE).unwrap();
        assert_eq!(
            table.weekdays().into_iter().collect::<Vec<_>>(),
            [Weekday::Monday, Weekday::Friday]
        );
        assert_eq!(
            table.months().into_iter().collect::<Vec<_>>(),
            [Month::Jan, Month::Feb]
        );
        assert_eq!(
            table.municipalities().into_iter().collect::<Vec<_>>(),
            ["Lisboa", "Oeiras"]
        );
    }
}
