//! HTTP handler functions for the accidents dashboard API.

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, QueryPayloadError},
    web,
};
use lisbon_accidents_accident_models::{HOURS_PER_DAY, Severity};
use lisbon_accidents_analytics::{FilterError, aggregate, filter};
use lisbon_accidents_analytics_models::FilterSelection;
use lisbon_accidents_dataset::AccidentTable;
use lisbon_accidents_server_models::{
    ApiDashboard, ApiFilterOptions, ApiHealth, EMPTY_RESULT_MESSAGE, FilterQueryParams,
};

use crate::{AppState, Dataset, markers};

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        dataset_loaded: matches!(state.dataset, Dataset::Loaded(_)),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/options`
///
/// Returns the domains for every filter control.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    let table = match loaded(&state) {
        Ok(table) => table,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(ApiFilterOptions {
        severities: Severity::all().to_vec(),
        weekdays: table.weekdays().into_iter().collect(),
        months: table.months().into_iter().collect(),
        municipalities: table
            .municipalities()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect(),
        hour_min: 0,
        hour_max: HOURS_PER_DAY - 1,
        total_accidents: table.len() as u64,
        load_report: table.report().clone(),
    })
}

/// `GET /api/dashboard`
///
/// Filters the table and returns every aggregate display for the result.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let table = match loaded(&state) {
        Ok(table) => table,
        Err(response) => return response,
    };
    let selected = match to_filter(&params) {
        Ok(f) => f,
        Err(e) => return bad_request(&e),
    };

    let selection = filter::apply(table, &selected);
    let empty = selection.is_empty();

    HttpResponse::Ok().json(ApiDashboard {
        total_accidents: table.len() as u64,
        empty,
        message: empty.then(|| EMPTY_RESULT_MESSAGE.to_string()),
        summary: aggregate::summarize(table, &selection),
    })
}

/// `GET /api/markers`
///
/// Returns the filtered accidents as a `GeoJSON` `FeatureCollection`.
pub async fn markers(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let table = match loaded(&state) {
        Ok(table) => table,
        Err(response) => return response,
    };
    let selected = match to_filter(&params) {
        Ok(f) => f,
        Err(e) => return bad_request(&e),
    };

    let selection = filter::apply(table, &selected);

    match markers::feature_collection(table, &selection) {
        Ok(collection) => HttpResponse::Ok()
            .content_type("application/geo+json")
            .json(collection),
        Err(e) => {
            log::error!("Failed to build marker layer: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to build marker layer"
            }))
        }
    }
}

/// Returns the loaded table, or a 503 response carrying the load error.
fn loaded(state: &AppState) -> Result<&AccidentTable, HttpResponse> {
    match &state.dataset {
        Dataset::Loaded(table) => Ok(table),
        Dataset::Unavailable(message) => {
            Err(HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": message
            })))
        }
    }
}

/// Converts query parameters into a [`FilterSelection`].
fn to_filter(params: &FilterQueryParams) -> Result<FilterSelection, FilterError> {
    Ok(FilterSelection {
        severities: filter::parse_values("severity", params.severities.as_deref())?,
        hours: filter::parse_hours(params.hour_start, params.hour_end)?,
        weekdays: filter::parse_values("weekday", params.weekdays.as_deref())?,
        months: filter::parse_values("month", params.months.as_deref())?,
        municipalities: filter::parse_values("municipality", params.municipalities.as_deref())?,
    })
}

/// Turns a query string that does not deserialize (e.g. `hourStart=300`)
/// into the same JSON error body as a rejected filter value.
pub fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected query '{}': {err}", req.query_string());
    let response = HttpResponse::BadRequest().json(serde_json::json!({
        "error": err.to_string()
    }));
    InternalError::from_response(err, response).into()
}

fn bad_request(e: &FilterError) -> HttpResponse {
    log::warn!("Rejected filter: {e}");
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": e.to_string()
    }))
}
