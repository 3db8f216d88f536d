use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use logitrack_geo::{GeolocateClient, PositionError, PositionOptions, PositionProvider};

fn options(high_accuracy: bool, timeout: Duration, max_age: Duration) -> PositionOptions {
    PositionOptions {
        high_accuracy,
        timeout,
        max_age,
    }
}

fn fix_body() -> serde_json::Value {
    json!({
        "location": { "lat": -12.05, "lng": -77.03 },
        "accuracy": 25.0
    })
}

fn client_for(server: &MockServer) -> GeolocateClient {
    GeolocateClient::new(&format!("{}/v1/geolocate", server.uri()), "logitrack-test").unwrap()
}

#[tokio::test]
async fn resolves_a_fix_from_the_geolocate_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/geolocate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fix_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let fix = client
        .request_position(&options(true, Duration::from_secs(5), Duration::ZERO))
        .await
        .unwrap();

    assert!((fix.latitude - (-12.05)).abs() < 1e-9);
    assert!((fix.longitude - (-77.03)).abs() < 1e-9);
    assert!((fix.accuracy_m - 25.0).abs() < 1e-9);
}

#[tokio::test]
async fn high_accuracy_requests_forbid_ip_positioning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/geolocate"))
        .and(body_json(json!({ "considerIp": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(fix_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .request_position(&options(true, Duration::from_secs(5), Duration::ZERO))
        .await
        .unwrap();
}

#[tokio::test]
async fn low_accuracy_requests_allow_ip_positioning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/geolocate"))
        .and(body_json(json!({ "considerIp": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(fix_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .request_position(&options(false, Duration::from_secs(5), Duration::ZERO))
        .await
        .unwrap();
}

#[tokio::test]
async fn forbidden_maps_to_permission_denied() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/geolocate"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .request_position(&options(true, Duration::from_secs(5), Duration::ZERO))
        .await
        .unwrap_err();
    assert_eq!(error, PositionError::PermissionDenied);
}

#[tokio::test]
async fn missing_endpoint_maps_to_position_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/geolocate"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .request_position(&options(true, Duration::from_secs(5), Duration::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(error, PositionError::PositionUnavailable { .. }));
}

#[tokio::test]
async fn malformed_body_maps_to_position_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/geolocate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .request_position(&options(true, Duration::from_secs(5), Duration::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(error, PositionError::PositionUnavailable { .. }));
}

#[tokio::test]
async fn slow_endpoint_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/geolocate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fix_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .request_position(&options(true, Duration::from_millis(50), Duration::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(error, PositionError::Timeout { .. }));
}

#[tokio::test]
async fn a_fresh_fix_is_served_from_cache_within_max_age() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/geolocate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fix_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let opts = options(true, Duration::from_secs(5), Duration::from_secs(60));

    let first = client.request_position(&opts).await.unwrap();
    let second = client.request_position(&opts).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn zero_max_age_forces_a_fresh_fix() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/geolocate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fix_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let opts = options(true, Duration::from_secs(5), Duration::ZERO);

    client.request_position(&opts).await.unwrap();
    client.request_position(&opts).await.unwrap();
}
