//! Reverse geocoding against an external provider, behind a process-wide
//! rate limiter, plus the [`LocationResolver`] that combines it with the
//! local postal-code table.

pub mod client;
pub mod clock;
pub mod error;
pub mod rate_limit;
pub mod resolver;
pub mod types;

pub use client::{GeocodingClient, ReverseFuture, ReverseGeocoder, DEFAULT_USER_AGENT};
pub use clock::{Clock, ManualClock, TokioClock};
pub use error::GeocodeError;
pub use rate_limit::RateLimiter;
pub use resolver::{LocationResolver, FALLBACK_MIN_CONFIDENCE};
pub use types::{GeocodedAddress, NominatimAddress, NominatimReverse, ReverseOutcome};
