//! HTTP client for the Nominatim reverse-geocoding API.
//!
//! Every request is gated twice: coordinates outside Nigeria are rejected
//! before anything else happens, and the shared [`RateLimiter`] is acquired
//! before the request goes out. Upstream failures are surfaced as typed
//! errors and never retried here.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use ngpost_core::{is_within_nigeria, AppConfig, Coordinates};
use reqwest::{header, Client, Url};

use crate::error::GeocodeError;
use crate::rate_limit::RateLimiter;
use crate::types::{GeocodedAddress, NominatimReverse, ReverseOutcome};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
pub const DEFAULT_USER_AGENT: &str = "NigerianPostalCodeFinder/1.0";

/// Future returned by [`ReverseGeocoder::reverse`].
pub type ReverseFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ReverseOutcome, GeocodeError>> + Send + 'a>>;

/// Seam over the provider so the resolver and validation runner can be
/// driven by fakes.
pub trait ReverseGeocoder: Send + Sync {
    fn reverse(&self, lat: f64, lng: f64) -> ReverseFuture<'_>;
}

impl<T: ReverseGeocoder + ?Sized> ReverseGeocoder for Arc<T> {
    fn reverse(&self, lat: f64, lng: f64) -> ReverseFuture<'_> {
        (**self).reverse(lat, lng)
    }
}

/// Client for the Nominatim reverse endpoint.
///
/// Use [`GeocodingClient::new`] for production or
/// [`GeocodingClient::with_base_url`] to point at a mock server in tests.
pub struct GeocodingClient {
    client: Client,
    reverse_url: Url,
    limiter: Arc<RateLimiter>,
}

impl GeocodingClient {
    /// Creates a client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        user_agent: &str,
        timeout_secs: u64,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, GeocodeError> {
        Self::with_base_url(user_agent, timeout_secs, DEFAULT_BASE_URL, limiter)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joining "reverse" appends a segment
        // instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let reverse_url = Url::parse(&normalised)
            .and_then(|base| base.join("reverse"))
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            reverse_url,
            limiter,
        })
    }

    /// Builds a client from the geocoder section of [`AppConfig`].
    ///
    /// # Errors
    ///
    /// Same as [`GeocodingClient::with_base_url`].
    pub fn from_config(config: &AppConfig, limiter: Arc<RateLimiter>) -> Result<Self, GeocodeError> {
        Self::with_base_url(
            &config.geocoder_user_agent,
            config.geocoder_timeout_secs,
            &config.geocoder_base_url,
            limiter,
        )
    }

    #[must_use]
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Reverse-geocodes a point.
    ///
    /// Returns [`ReverseOutcome::NoAddress`] when the provider answers with
    /// an error document.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::InvalidCoordinates`] if the point is outside Nigeria
    ///   (no request is made and the limiter is not touched).
    /// - [`GeocodeError::GeocodingFailed`] on a non-2xx status.
    /// - [`GeocodeError::Http`] on network failure or timeout.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected JSON.
    pub async fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<ReverseOutcome, GeocodeError> {
        if !is_within_nigeria(lat, lng) {
            return Err(GeocodeError::InvalidCoordinates { lat, lng });
        }

        self.limiter.acquire().await;

        let url = self.build_url(lat, lng);
        tracing::debug!(lat, lng, "reverse geocoding");
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                lat,
                lng,
                "geocoding provider returned non-success status"
            );
            return Err(GeocodeError::GeocodingFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let context = || format!("reverse(lat={lat}, lng={lng})");
        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: context(),
                source: e,
            })?;
        let parsed: NominatimReverse =
            serde_json::from_value(raw.clone()).map_err(|e| GeocodeError::Deserialize {
                context: context(),
                source: e,
            })?;

        if let Some(message) = parsed.error.as_deref() {
            tracing::warn!(
                lat,
                lng,
                provider_error = message,
                "geocoding provider returned an error document"
            );
        }

        Ok(GeocodedAddress::from_response(
            parsed,
            Coordinates { lat, lng },
            raw,
        ))
    }

    /// Builds the reverse URL with percent-encoded query parameters.
    fn build_url(&self, lat: f64, lng: f64) -> Url {
        let mut url = self.reverse_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lng.to_string())
            .append_pair("format", "json")
            .append_pair("addressdetails", "1");
        url
    }
}

impl ReverseGeocoder for GeocodingClient {
    fn reverse(&self, lat: f64, lng: f64) -> ReverseFuture<'_> {
        Box::pin(self.reverse_geocode(lat, lng))
    }
}
