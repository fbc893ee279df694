//! Filter predicates and row selections.

use std::collections::BTreeSet;
use std::str::FromStr;

use lisbon_accidents_accident_models::AccidentRecord;
use lisbon_accidents_analytics_models::{FilterSelection, HourRange};
use lisbon_accidents_dataset::AccidentTable;

use crate::FilterError;

/// Row indices of the records that survived a filter, ascending.
///
/// A selection borrows nothing; it is only meaningful together with the
/// table it was computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    /// Selects every row of `table`.
    #[must_use]
    pub fn all(table: &AccidentTable) -> Self {
        Self {
            indices: (0..table.len()).collect(),
        }
    }

    /// Selected row indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates the selected records of `table`.
    pub fn records<'a>(
        &'a self,
        table: &'a AccidentTable,
    ) -> impl Iterator<Item = &'a AccidentRecord> + 'a {
        self.indices.iter().filter_map(|&i| table.get(i))
    }
}

/// Whether `record` satisfies every active predicate of `filter`.
#[must_use]
pub fn matches(filter: &FilterSelection, record: &AccidentRecord) -> bool {
    (filter.severities.is_empty() || filter.severities.contains(&record.severity))
        && filter.hours.contains(record.hour)
        && (filter.weekdays.is_empty() || filter.weekdays.contains(&record.weekday))
        && (filter.months.is_empty()
            || record.month.is_some_and(|m| filter.months.contains(&m)))
        && (filter.municipalities.is_empty()
            || record
                .municipality
                .as_ref()
                .is_some_and(|m| filter.municipalities.contains(m)))
}

/// Computes the rows of `table` that pass `filter`.
#[must_use]
pub fn apply(table: &AccidentTable, filter: &FilterSelection) -> Selection {
    if filter.is_unfiltered() {
        return Selection::all(table);
    }

    let indices: Vec<usize> = table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| matches(filter, r))
        .map(|(i, _)| i)
        .collect();

    log::debug!("Filter kept {}/{} accidents", indices.len(), table.len());

    Selection { indices }
}

/// Parses a comma-separated list of values for `field`.
///
/// `None`, an empty string, and blank entries contribute nothing.
///
/// # Errors
///
/// Returns [`FilterError::UnknownValue`] for the first entry that does not
/// parse.
pub fn parse_values<T>(field: &'static str, raw: Option<&str>) -> Result<BTreeSet<T>, FilterError>
where
    T: FromStr + Ord,
{
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| FilterError::UnknownValue {
                field,
                value: s.to_owned(),
            })
        })
        .collect()
}

/// Builds an hour range from optional bounds, defaulting to the whole day.
///
/// # Errors
///
/// Returns [`FilterError::HourRange`] if `start > end`.
pub fn parse_hours(start: Option<u8>, end: Option<u8>) -> Result<HourRange, FilterError> {
    Ok(HourRange::new(
        start.unwrap_or(HourRange::FULL.start),
        end.unwrap_or(HourRange::FULL.end),
    )?)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;

    use lisbon_accidents_accident_models::{InjuryCounts, Month, Severity, Weekday};

    use super::*;

    pub(crate) fn record(id: &str, severity: Severity, hour: u8, weekday: Weekday) -> AccidentRecord {
        AccidentRecord {
            id: id.to_owned(),
            latitude: 38.72,
            longitude: -9.14,
            hour,
            weekday,
            month: None,
            municipality: None,
            severity,
            injuries: InjuryCounts::default(),
            extra: BTreeMap::new(),
        }
    }

    /// Light/Severe/Severe at hours 8/8/22 on Mon/Mon/Fri.
    pub(crate) fn three_records() -> AccidentTable {
        AccidentTable::from_records(vec![
            record("1", Severity::Minor, 8, Weekday::Monday),
            record("2", Severity::Serious, 8, Weekday::Monday),
            record("3", Severity::Serious, 22, Weekday::Friday),
        ])
    }

    fn larger_table() -> AccidentTable {
        let mut records = Vec::new();
        for (i, hour) in (0..24u8).enumerate() {
            let severity = Severity::all()[i % Severity::all().len()];
            let weekday = Weekday::all()[i % Weekday::all().len()];
            let mut r = record(&i.to_string(), severity, hour, weekday);
            r.month = Some(Month::all()[i % 12]);
            r.municipality = Some(if i % 2 == 0 { "Lisboa" } else { "Oeiras" }.to_owned());
            records.push(r);
        }
        AccidentTable::from_records(records)
    }

    fn sample_filters() -> Vec<FilterSelection> {
        vec![
            FilterSelection::default(),
            FilterSelection {
                severities: BTreeSet::from([Severity::Fatal, Severity::Minor]),
                ..FilterSelection::default()
            },
            FilterSelection {
                hours: HourRange::new(6, 18).unwrap(),
                weekdays: BTreeSet::from([Weekday::Monday, Weekday::Sunday]),
                ..FilterSelection::default()
            },
            FilterSelection {
                months: BTreeSet::from([Month::Feb, Month::Mar]),
                municipalities: BTreeSet::from(["Lisboa".to_owned()]),
                ..FilterSelection::default()
            },
        ]
    }

    #[test]
    fn severe_only_returns_both_severe_rows() {
        let table = three_records();
        let filter = FilterSelection {
            severities: BTreeSet::from([Severity::Serious]),
            hours: HourRange::FULL,
            ..FilterSelection::default()
        };
        let selection = apply(&table, &filter);
        assert_eq!(selection.indices(), [1, 2]);
        let hours: Vec<u8> = selection.records(&table).map(|r| r.hour).collect();
        assert_eq!(hours, [8, 22]);
    }

    #[test]
    fn absent_severity_yields_empty_selection() {
        let table = three_records();
        let filter = FilterSelection {
            severities: BTreeSet::from([Severity::Fatal]),
            ..FilterSelection::default()
        };
        assert!(apply(&table, &filter).is_empty());
    }

    #[test]
    fn full_ranges_reproduce_the_table() {
        let table = larger_table();
        let filter = FilterSelection {
            severities: Severity::all().iter().copied().collect(),
            hours: HourRange::FULL,
            weekdays: Weekday::all().iter().copied().collect(),
            ..FilterSelection::default()
        };
        assert_eq!(apply(&table, &filter), Selection::all(&table));
    }

    #[test]
    fn selection_is_a_duplicate_free_subset() {
        let table = larger_table();
        for filter in sample_filters() {
            let selection = apply(&table, &filter);
            let unique: BTreeSet<usize> = selection.indices().iter().copied().collect();
            assert_eq!(unique.len(), selection.len());
            assert!(selection.indices().iter().all(|&i| i < table.len()));
            assert!(selection.indices().windows(2).all(|w| w[0] < w[1]));
            assert!(selection.records(&table).all(|r| matches(&filter, r)));
        }
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let table = larger_table();
        for filter in sample_filters() {
            assert_eq!(apply(&table, &filter), apply(&table, &filter));
        }
    }

    #[test]
    fn widening_hours_never_shrinks_the_selection() {
        let table = larger_table();
        let mut previous = 0;
        for end in 0..24 {
            let filter = FilterSelection {
                hours: HourRange::new(0, end).unwrap(),
                ..FilterSelection::default()
            };
            let size = apply(&table, &filter).len();
            assert!(size >= previous);
            previous = size;
        }
        assert_eq!(previous, table.len());
    }

    #[test]
    fn adding_a_weekday_never_shrinks_the_selection() {
        let table = larger_table();
        let mut weekdays = BTreeSet::new();
        let mut previous = 0;
        for day in Weekday::all() {
            weekdays.insert(*day);
            let filter = FilterSelection {
                weekdays: weekdays.clone(),
                ..FilterSelection::default()
            };
            let size = apply(&table, &filter).len();
            assert!(size >= previous);
            previous = size;
        }
    }

    #[test]
    fn month_filter_excludes_records_without_month() {
        let table = three_records();
        let filter = FilterSelection {
            months: BTreeSet::from([Month::Jan]),
            ..FilterSelection::default()
        };
        assert!(apply(&table, &filter).is_empty());
    }

    #[test]
    fn parses_comma_separated_values() {
        let parsed: BTreeSet<Severity> =
            parse_values("severity", Some("Severe, Fatal,,")).unwrap();
        assert_eq!(parsed, BTreeSet::from([Severity::Fatal, Severity::Serious]));

        let none: BTreeSet<Weekday> = parse_values("weekday", None).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn rejects_unknown_values() {
        let err = parse_values::<Weekday>("weekday", Some("Mon,Blursday")).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownValue {
                field: "weekday",
                value: "Blursday".to_owned(),
            }
        );
    }

    #[test]
    fn parses_hour_bounds() {
        assert_eq!(parse_hours(None, None).unwrap(), HourRange::FULL);
        assert_eq!(
            parse_hours(Some(7), None).unwrap(),
            HourRange::new(7, 23).unwrap()
        );
        assert!(matches!(
            parse_hours(Some(9), Some(3)),
            Err(FilterError::HourRange(_))
        ));
    }
}
