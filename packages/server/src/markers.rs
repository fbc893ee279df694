//! `GeoJSON` marker layer for the map view.

use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use lisbon_accidents_accident_models::Severity;
use lisbon_accidents_analytics::filter::Selection;
use lisbon_accidents_dataset::AccidentTable;
use lisbon_accidents_server_models::ApiMarkerProperties;

/// Marker colour for each severity.
#[must_use]
pub const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Fatal => "black",
        Severity::Serious => "orange",
        Severity::Minor => "blue",
        Severity::NoInjury => "gray",
    }
}

/// Builds one point feature per selected accident.
///
/// # Errors
///
/// Returns an error if marker properties fail to serialize.
pub fn feature_collection(
    table: &AccidentTable,
    selection: &Selection,
) -> Result<FeatureCollection, serde_json::Error> {
    let features = selection
        .records(table)
        .map(|record| {
            let point = geojson::Value::from(&Point::new(record.longitude, record.latitude));
            let properties = ApiMarkerProperties::new(record, severity_color(record.severity));
            Ok(Feature {
                bbox: None,
                geometry: Some(Geometry::new(point)),
                id: None,
                properties: Some(to_object(&properties)?),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

fn to_object(properties: &ApiMarkerProperties) -> Result<JsonObject, serde_json::Error> {
    match serde_json::to_value(properties)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "marker properties serialized to non-object {other}"
        ))),
    }
}
