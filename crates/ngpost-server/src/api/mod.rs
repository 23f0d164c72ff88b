mod lookup;
mod states;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use ngpost_core::ErrorKind;
use ngpost_geocoder::{GeocodeError, LocationResolver, ReverseGeocoder};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Resolver over a type-erased geocoder, so tests can swap in fakes.
pub type SharedResolver = LocationResolver<Arc<dyn ReverseGeocoder>>;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<SharedResolver>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

/// Lookup envelope: `result` is `null` when nothing matched.
#[derive(Debug, Serialize)]
pub struct LookupResponse<T: Serialize> {
    pub result: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub message: String,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    postal_codes: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    fn new(
        request_id: impl Into<String>,
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error: code.into(),
            message: message.into(),
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    /// Error in the lookup taxonomy; the status comes from the kind.
    pub fn from_kind(request_id: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        let status =
            StatusCode::from_u16(kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(request_id, status, kind.code(), message)
    }

    /// Inbound rate limit exceeded. Not part of the lookup taxonomy.
    pub fn rate_limited(request_id: impl Into<String>) -> Self {
        Self::new(
            request_id,
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Maps a geocoder failure onto the wire taxonomy. Server errors are logged
/// in full and answered with a generic message.
pub(super) fn map_geocode_error(request_id: String, error: &GeocodeError) -> ApiError {
    let kind = error.kind();
    match error {
        GeocodeError::InvalidCoordinates { .. } => ApiError::from_kind(
            request_id,
            kind,
            "coordinates must lie within Nigeria (lat 4.0 to 14.0, lng 2.5 to 15.0)",
        ),
        GeocodeError::GeocodingFailed { status } => {
            ApiError::from_kind(request_id, kind, format!("geocoding provider returned HTTP {status}"))
        }
        _ => {
            tracing::error!(request_id = %request_id, error = %error, "geocoder request failed");
            ApiError::from_kind(request_id, kind, "internal server error")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn lookup_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/lookup/manual", post(lookup::manual))
        .route("/api/v1/lookup/reverse-geocode", post(lookup::reverse_geocode))
        .route("/api/v1/geocode", get(lookup::geocode))
        .route("/api/v1/states", get(states::list_states))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(lookup_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            postal_codes: state.resolver.table().len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
