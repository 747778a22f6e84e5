//! ForecastClient against a mocked weatherapi.com
//!
//! The server checks the query string the client sends and answers with
//! canned bodies, so no real network or key is needed.

use std::net::TcpListener;
use std::time::Duration;

use pretty_assertions::assert_eq;
use weather_lookup::action::Action;
use weather_lookup::api::{FETCH_FAILED_MESSAGE, FetchError, ForecastClient};
use weather_lookup::config::Config;
use weather_lookup::effect::fetch_forecast;
use weather_lookup::state::{Coordinate, ForecastResult, LocationQuery};
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

const TEST_KEY: &str = "test-key";

fn client_for(server: &MockServer) -> ForecastClient {
    let config = Config::with_base_url(TEST_KEY, server.uri());
    ForecastClient::new(&config).expect("client should build")
}

/// Trimmed-down weatherapi.com current-conditions body
fn paris_body() -> serde_json::Value {
    serde_json::json!({
        "location": {
            "name": "Paris",
            "region": "Ile-de-France",
            "country": "France",
            "lat": 48.87,
            "lon": 2.33,
            "localtime": "2026-10-19 14:00"
        },
        "current": {
            "last_updated": "2026-10-19 13:45",
            "temp_c": 18.0,
            "temp_f": 64.4,
            "condition": {
                "text": "Cloudy",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/119.png",
                "code": 1006
            },
            "wind_kph": 11.2,
            "wind_dir": "WSW",
            "humidity": 72,
            "feelslike_c": 17.0,
            "feelslike_f": 62.6,
            "vis_km": 10.0
        },
        "forecast": { "forecastday": [] }
    })
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn test_text_search_decodes_current_conditions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("key", TEST_KEY))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = client_for(&server)
        .fetch(&LocationQuery::Text("Paris".into()))
        .await
        .expect("fetch should succeed");

    assert_eq!(
        forecast,
        ForecastResult {
            name: "Paris".into(),
            region: "Ile-de-France".into(),
            country: "France".into(),
            condition_text: "Cloudy".into(),
            condition_icon: "//cdn.weatherapi.com/weather/64x64/day/119.png".into(),
            condition_code: Some(1006),
            temp_c: 18.0,
            temp_f: 64.4,
            feelslike_c: 17.0,
            feelslike_f: 62.6,
            humidity: 72,
            wind_kph: 11.2,
            wind_dir: "WSW".into(),
            vis_km: 10.0,
            last_updated: Some("2026-10-19 13:45".into()),
        }
    );
    assert_eq!(forecast.heading(), "Paris, France");
    assert_eq!(forecast.temperature_line(), "18°C");
}

#[tokio::test]
async fn test_text_search_sends_no_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .mount(&server)
        .await;

    client_for(&server)
        .fetch(&LocationQuery::Text("New York".into()))
        .await
        .expect("fetch should succeed");

    let requests: Vec<Request> = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let has_days = requests[0].url.query_pairs().any(|(k, _)| k == "days");
    assert!(!has_days);
    let q = requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned());
    assert_eq!(q.as_deref(), Some("New York"));
}

#[tokio::test]
async fn test_coordinate_lookup_asks_for_one_day() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "51.5,-0.12"))
        .and(query_param("days", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch(&LocationQuery::Coordinate(Coordinate::new(51.5, -0.12)))
        .await;

    assert!(result.is_ok(), "coordinate fetch failed: {result:?}");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "code": 2006, "message": "API key is invalid." }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch(&LocationQuery::Text("Paris".into()))
        .await
        .unwrap_err();

    match &err {
        FetchError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("API key is invalid"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(err.user_message(), FETCH_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"location\": {}}"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch(&LocationQuery::Text("Paris".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let config = Config {
        timeout: Duration::from_secs(2),
        ..Config::with_base_url(TEST_KEY, format!("http://127.0.0.1:{port}"))
    };
    let client = ForecastClient::new(&config).expect("client should build");
    let err = client
        .fetch(&LocationQuery::Text("Paris".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
    assert_eq!(err.user_message(), FETCH_FAILED_MESSAGE);
}

// =============================================================================
// Effect settlement
// =============================================================================

#[tokio::test]
async fn test_fetch_effect_settles_with_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .mount(&server)
        .await;

    let action = fetch_forecast(
        &client_for(&server),
        7,
        LocationQuery::Text("Paris".into()),
    )
    .await;

    match action {
        Action::ForecastDidLoad {
            request_id,
            forecast,
        } => {
            assert_eq!(request_id, 7);
            assert_eq!(forecast.place_line(), "Paris, Ile-de-France, France");
        }
        other => panic!("expected ForecastDidLoad, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_effect_maps_failure_to_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&server)
        .await;

    let action = fetch_forecast(
        &client_for(&server),
        3,
        LocationQuery::Coordinate(Coordinate::new(0.0, 0.0)),
    )
    .await;

    assert_eq!(
        action,
        Action::ForecastDidError {
            request_id: 3,
            message: FETCH_FAILED_MESSAGE.into(),
        }
    );
}
