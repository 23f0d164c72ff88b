//! Runner behavior against a mocked provider.

use std::sync::Arc;
use std::time::Duration;

use ngpost_core::PostalCodeTable;
use ngpost_geocoder::{GeocodingClient, ManualClock, RateLimiter};
use ngpost_matching::{MatchStatus, MatchType};
use ngpost_validation::{TestCase, ValidationRunner};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(base_url: &str, timeout_secs: u64) -> GeocodingClient {
    let limiter = RateLimiter::with_clock(Duration::from_millis(2000), Arc::new(ManualClock::new()));
    GeocodingClient::with_base_url("test", timeout_secs, base_url, Arc::new(limiter))
        .expect("client construction should not fail")
}

fn case(id: &str, name: &str) -> TestCase {
    TestCase {
        coordinate_id: id.to_owned(),
        location_name: name.to_owned(),
        latitude: 6.6018,
        longitude: 3.3515,
    }
}

#[tokio::test]
async fn provider_timeout_is_recorded_as_failed_case() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "display_name": "Ikeja" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let table = Arc::new(PostalCodeTable::embedded().expect("embedded table parses"));
    let runner = ValidationRunner::new(client(&server.uri(), 1), table);
    let result = runner.run_case(&case("1", "Ikeja City Mall")).await;

    assert_eq!(result.status, MatchStatus::Failed);
    assert_eq!(result.match_type, MatchType::None);
    assert_eq!(result.failure_reason.as_deref(), Some("geocoder request timed out"));
    assert!(result.raw_provider_response.is_none());
}

#[tokio::test]
async fn provider_error_document_is_kept_on_the_result() {
    let server = MockServer::start().await;
    let body = serde_json::json!({ "error": "Unable to geocode" });

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let table = Arc::new(PostalCodeTable::embedded().expect("embedded table parses"));
    let runner = ValidationRunner::new(client(&server.uri(), 5), table);
    let result = runner.run_case(&case("2", "Lagoon")).await;

    assert_eq!(result.status, MatchStatus::Failed);
    assert_eq!(result.failure_reason.as_deref(), Some("geocoder returned no address"));
    assert_eq!(result.raw_provider_response, Some(body));
}
