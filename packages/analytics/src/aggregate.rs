//! Aggregate displays over a filtered selection.
//!
//! Every grouping is zero-filled over its full domain so the charts keep a
//! stable axis as filters change. Ties in the insights go to the value that
//! comes first in the domain's canonical order.

use lisbon_accidents_accident_models::{HOURS_PER_DAY, Month, Severity, Weekday};
use lisbon_accidents_analytics_models::{
    Bucket, DashboardSummary, Insights, Kpis, MapCenter, WeekdayHourMatrix,
};
use lisbon_accidents_dataset::AccidentTable;
use lisbon_accidents_dataset::bounds::LISBON_CENTER;

use crate::filter::Selection;

/// Computes every aggregate display for `selection`.
#[must_use]
pub fn summarize(table: &AccidentTable, selection: &Selection) -> DashboardSummary {
    let by_hour = by_hour(table, selection);
    let by_weekday = by_weekday(table, selection);
    let by_severity = by_severity(table, selection);

    let insights = Insights {
        peak_hour: top_key(&by_hour),
        top_weekday: top_key(&by_weekday),
        top_severity: top_key(&by_severity),
    };

    DashboardSummary {
        kpis: kpis(table, selection),
        by_month: by_month(table, selection),
        weekday_hour: weekday_hour(table, selection),
        center: center(table, selection),
        by_hour,
        by_weekday,
        by_severity,
        insights,
    }
}

/// Headline counts and casualty totals.
#[must_use]
pub fn kpis(table: &AccidentTable, selection: &Selection) -> Kpis {
    selection
        .records(table)
        .fold(Kpis::default(), |mut acc, r| {
            acc.accidents += 1;
            acc.fatalities += u64::from(r.injuries.fatalities);
            acc.serious_injuries += u64::from(r.injuries.serious);
            acc.minor_injuries += u64::from(r.injuries.minor);
            acc
        })
}

/// Accidents per hour of day, 0 through 23.
#[must_use]
pub fn by_hour(table: &AccidentTable, selection: &Selection) -> Vec<Bucket<u8>> {
    let mut counts = [0u64; HOURS_PER_DAY as usize];
    for r in selection.records(table) {
        if let Some(slot) = counts.get_mut(usize::from(r.hour)) {
            *slot += 1;
        }
    }
    (0..HOURS_PER_DAY)
        .zip(counts)
        .map(|(key, count)| Bucket { key, count })
        .collect()
}

/// Accidents per weekday, Monday first.
#[must_use]
pub fn by_weekday(table: &AccidentTable, selection: &Selection) -> Vec<Bucket<Weekday>> {
    count_over(Weekday::all(), selection.records(table).map(|r| r.weekday))
}

/// Accidents per severity, most severe first.
#[must_use]
pub fn by_severity(table: &AccidentTable, selection: &Selection) -> Vec<Bucket<Severity>> {
    count_over(Severity::all(), selection.records(table).map(|r| r.severity))
}

/// Accidents per month, restricted to months that occur anywhere in the
/// table. Empty when the dataset records no months.
#[must_use]
pub fn by_month(table: &AccidentTable, selection: &Selection) -> Vec<Bucket<Month>> {
    let domain: Vec<Month> = table.months().into_iter().collect();
    count_over(&domain, selection.records(table).filter_map(|r| r.month))
}

/// Weekday × hour grid of accident counts.
#[must_use]
pub fn weekday_hour(table: &AccidentTable, selection: &Selection) -> WeekdayHourMatrix {
    let mut counts = vec![vec![0u64; HOURS_PER_DAY as usize]; Weekday::all().len()];
    for r in selection.records(table) {
        if let Some(slot) = counts
            .get_mut(r.weekday.index())
            .and_then(|row| row.get_mut(usize::from(r.hour)))
        {
            *slot += 1;
        }
    }
    WeekdayHourMatrix {
        weekdays: Weekday::all().to_vec(),
        hours: (0..HOURS_PER_DAY).collect(),
        counts,
    }
}

/// Mean position of the selection, or the Lisbon centre when it is empty.
#[must_use]
pub fn center(table: &AccidentTable, selection: &Selection) -> MapCenter {
    let (n, lat, lon) = selection
        .records(table)
        .fold((0usize, 0.0, 0.0), |(n, lat, lon), r| {
            (n + 1, lat + r.latitude, lon + r.longitude)
        });
    if n == 0 {
        return MapCenter {
            latitude: LISBON_CENTER.0,
            longitude: LISBON_CENTER.1,
        };
    }
    #[allow(clippy::cast_precision_loss)]
    let n = n as f64;
    MapCenter {
        latitude: lat / n,
        longitude: lon / n,
    }
}

/// Counts `values` against a fixed, ordered domain.
fn count_over<K: Copy + PartialEq>(
    domain: &[K],
    values: impl Iterator<Item = K>,
) -> Vec<Bucket<K>> {
    let mut buckets: Vec<Bucket<K>> = domain
        .iter()
        .map(|&key| Bucket { key, count: 0 })
        .collect();
    for value in values {
        if let Some(bucket) = buckets.iter_mut().find(|b| b.key == value) {
            bucket.count += 1;
        }
    }
    buckets
}

/// Key of the largest non-zero bucket; the earliest wins ties.
fn top_key<K: Copy>(buckets: &[Bucket<K>]) -> Option<K> {
    buckets
        .iter()
        .fold(None::<&Bucket<K>>, |best, b| match best {
            Some(top) if top.count >= b.count => Some(top),
            _ if b.count > 0 => Some(b),
            _ => best,
        })
        .map(|b| b.key)
}
