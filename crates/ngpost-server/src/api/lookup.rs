use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use ngpost_core::{is_within_nigeria, ErrorKind, LocationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{map_geocode_error, ApiError, AppState, LookupResponse, ResponseMeta};

const COORDINATES_MESSAGE: &str = "lat and lng must be numbers within Nigeria";

/// Condensed answer of the coordinate lookup.
#[derive(Debug, Serialize)]
pub(super) struct ReverseGeocodeItem {
    pub address: String,
    pub state: Option<String>,
    pub lga: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

fn non_blank_string<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Applies the bounds check, so out-of-range or missing coordinates never
/// reach the geocoder.
fn coordinates(
    request_id: &str,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<(f64, f64), ApiError> {
    match (lat, lng) {
        (Some(lat), Some(lng)) if is_within_nigeria(lat, lng) => Ok((lat, lng)),
        _ => Err(ApiError::from_kind(
            request_id,
            ErrorKind::InvalidCoordinates,
            COORDINATES_MESSAGE,
        )),
    }
}

pub(super) async fn manual(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LookupResponse<LocationResult>>, ApiError> {
    let invalid = || {
        ApiError::from_kind(
            req_id.0.clone(),
            ErrorKind::InvalidInput,
            "state and lga are required non-empty strings",
        )
    };
    let Json(body) = payload.map_err(|_| invalid())?;
    let (Some(lookup_state), Some(lga)) = (
        non_blank_string(&body, "state"),
        non_blank_string(&body, "lga"),
    ) else {
        return Err(invalid());
    };

    let result = state.resolver.resolve_by_state_lga(lookup_state, lga);
    tracing::debug!(state = lookup_state, lga, hit = result.is_some(), "manual lookup");

    Ok(Json(LookupResponse {
        result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn reverse_geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LookupResponse<ReverseGeocodeItem>>, ApiError> {
    let Json(body) = payload.map_err(|_| {
        ApiError::from_kind(
            req_id.0.clone(),
            ErrorKind::InvalidCoordinates,
            COORDINATES_MESSAGE,
        )
    })?;
    let (lat, lng) = coordinates(
        &req_id.0,
        body.get("lat").and_then(Value::as_f64),
        body.get("lng").and_then(Value::as_f64),
    )?;

    let resolved = state
        .resolver
        .resolve_by_coordinates(lat, lng)
        .await
        .map_err(|e| map_geocode_error(req_id.0.clone(), &e))?;

    let result = resolved.map(|r| ReverseGeocodeItem {
        address: r.address,
        state: r.state,
        lga: r.lga,
        postal_code: r.postal_code,
    });

    Ok(Json(LookupResponse {
        result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Coordinate lookup that falls back to scoring the table when the provider
/// has no postcode.
pub(super) async fn geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<LookupResponse<LocationResult>>, ApiError> {
    let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<f64>().ok());
    let (lat, lng) = coordinates(
        &req_id.0,
        parse(params.lat.as_deref()),
        parse(params.lng.as_deref()),
    )?;

    let result = state
        .resolver
        .resolve_with_fallback(lat, lng)
        .await
        .map_err(|e| map_geocode_error(req_id.0.clone(), &e))?;

    Ok(Json(LookupResponse {
        result,
        meta: ResponseMeta::new(req_id.0),
    }))
}
