//! Integration tests for `GeocodingClient` using wiremock HTTP mocks.

use std::sync::Arc;
use std::time::Duration;

use ngpost_core::ErrorKind;
use ngpost_geocoder::{GeocodeError, GeocodingClient, ManualClock, RateLimiter, ReverseOutcome};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GeocodingClient {
    let limiter = RateLimiter::with_clock(Duration::from_millis(2000), Arc::new(ManualClock::new()));
    GeocodingClient::with_base_url(
        "NigerianPostalCodeFinder/1.0",
        5,
        base_url,
        Arc::new(limiter),
    )
    .expect("client construction should not fail")
}

#[tokio::test]
async fn reverse_geocode_normalizes_partial_address() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "place_id": 1234,
        "display_name": "Obafemi Awolowo Way, Ikeja, Lagos State, Nigeria",
        "address": {
            "road": "Obafemi Awolowo Way",
            "county": "Ikeja",
            "state": "Lagos",
            "country": "Nigeria",
            "country_code": "ng"
        }
    });

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "6.6018"))
        .and(query_param("lon", "3.3515"))
        .and(query_param("format", "json"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", "NigerianPostalCodeFinder/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let geo = client
        .reverse_geocode(6.6018, 3.3515)
        .await
        .expect("request should succeed")
        .into_address()
        .expect("provider returned an address");

    assert_eq!(geo.address, "Obafemi Awolowo Way, Ikeja, Lagos State, Nigeria");
    assert_eq!(geo.state.as_deref(), Some("Lagos"));
    assert_eq!(geo.lga.as_deref(), Some("Ikeja"));
    assert!(geo.postal_code.is_none());
    assert_eq!(geo.raw["place_id"], 1234);
}

#[tokio::test]
async fn reverse_geocode_reads_postcode_and_city_fallback() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "display_name": "Adeola Odeku Street, Victoria Island, Lagos",
        "address": {
            "suburb": "Victoria Island",
            "city": "Eti-Osa",
            "state": "Lagos",
            "postcode": "101241"
        }
    });

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let geo = test_client(&server.uri())
        .reverse_geocode(6.4281, 3.4219)
        .await
        .unwrap()
        .into_address()
        .unwrap();

    assert_eq!(geo.lga.as_deref(), Some("Eti-Osa"));
    assert_eq!(geo.area.as_deref(), Some("Victoria Island"));
    assert_eq!(geo.postal_code.as_deref(), Some("101241"));
}

#[tokio::test]
async fn provider_error_document_is_no_address() {
    let server = MockServer::start().await;
    let body = serde_json::json!({ "error": "Unable to geocode" });

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .reverse_geocode(6.5, 3.4)
        .await
        .unwrap();
    assert_eq!(result, ReverseOutcome::NoAddress { raw: body });
}

#[tokio::test]
async fn missing_display_name_keeps_administrative_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": { "state": "Lagos", "county": "Ikeja" }
        })))
        .mount(&server)
        .await;

    let geo = test_client(&server.uri())
        .reverse_geocode(6.6, 3.35)
        .await
        .unwrap()
        .into_address()
        .expect("partial document is still an address");
    assert_eq!(geo.address, "");
    assert_eq!(geo.state.as_deref(), Some("Lagos"));
    assert_eq!(geo.lga.as_deref(), Some("Ikeja"));
}

#[tokio::test]
async fn slow_provider_times_out_as_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "display_name": "Lagos" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let limiter = RateLimiter::with_clock(Duration::from_millis(2000), Arc::new(ManualClock::new()));
    let client = GeocodingClient::with_base_url("test", 1, &server.uri(), Arc::new(limiter))
        .expect("client construction should not fail");

    let err = client.reverse_geocode(6.5, 3.4).await.unwrap_err();
    assert!(matches!(&err, GeocodeError::Http(e) if e.is_timeout()), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::ServerError);
}

#[tokio::test]
async fn non_success_status_is_geocoding_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .reverse_geocode(6.5, 3.4)
        .await
        .unwrap_err();
    assert!(matches!(err, GeocodeError::GeocodingFailed { status: 503 }));
    assert_eq!(err.kind(), ErrorKind::GeocodingFailed);
}

#[tokio::test]
async fn malformed_body_is_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .reverse_geocode(6.5, 3.4)
        .await
        .unwrap_err();
    assert!(matches!(err, GeocodeError::Deserialize { .. }));
    assert_eq!(err.kind(), ErrorKind::ServerError);
}

#[tokio::test]
async fn out_of_bounds_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .reverse_geocode(51.5, -0.12)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCoordinates);
}

#[tokio::test]
async fn consecutive_requests_wait_for_the_limiter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "display_name": "Lagos" })),
        )
        .expect(3)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new());
    let limiter = Arc::new(RateLimiter::with_clock(
        Duration::from_millis(2000),
        clock.clone(),
    ));
    let client = GeocodingClient::with_base_url("test", 5, &server.uri(), limiter).unwrap();

    for _ in 0..3 {
        client.reverse_geocode(6.5, 3.4).await.unwrap();
    }
    assert!(clock.elapsed() >= Duration::from_millis(4000));
}
