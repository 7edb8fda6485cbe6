use std::sync::Arc;

use serde_json::json;
use weather_panel_core::{
    ControllerSettings, HttpBackend, MemoryView, PanelError, Units, ViewBinding, ViewController,
    WeatherBackend,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn snapshot_json(location: &str) -> serde_json::Value {
    json!({
        "location": location,
        "timestamp": "2024-05-01 12:00:00",
        "coordinates": "40.71, -74.01",
        "emoji": "☀️",
        "temperature": "75.2°F",
        "feels_like": "74.0°F",
        "temp_max": "78.1°F",
        "temp_min": "70.3°F",
        "humidity": "40%",
        "pressure": "1018 hPa",
        "wind_speed": "5.8 mph",
        "wind_direction": "180°",
        "visibility": "10.0 km",
        "cloudiness": "0%",
        "sunrise": "05:58",
        "sunset": "19:55",
        "description": "Clear Sky",
        "icon": "01d",
        "timezone": -14400
    })
}

#[tokio::test]
async fn weather_request_encodes_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("location", "New York, US"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": snapshot_json("New York, US")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), None).unwrap();
    let envelope = backend.weather("New York, US", Units::Imperial).await.unwrap();

    assert!(envelope.success);
    let data = envelope.data.expect("data should be present");
    assert_eq!(data.location, "New York, US");
    assert_eq!(data.temperature, "75.2°F");
}

#[tokio::test]
async fn error_status_body_is_still_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "City not found"
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), None).unwrap();
    let envelope = backend.weather("Atlantis", Units::Metric).await.unwrap();

    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some("City not found"));
}

#[tokio::test]
async fn non_json_body_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), None).unwrap();
    let err = backend.weather("Oslo", Units::Metric).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("Failed to parse JSON"));
    assert!(msg.contains("Bad Gateway"));
}

#[tokio::test]
async fn detect_location_decodes_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "location": "Berlin, DE"
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&format!("{}/", server.uri()), None).unwrap();
    let envelope = backend.detect_location().await.unwrap();

    assert_eq!(envelope.detected(), Some("Berlin, DE"));
}

#[tokio::test]
async fn controller_renders_backend_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("location", "New York"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": snapshot_json("New York, US")
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), None).unwrap();
    let view = Arc::new(MemoryView::with_location(" New York "));
    let ctl = ViewController::new(backend, Arc::clone(&view), ControllerSettings::default());

    ctl.fetch_weather().await.unwrap();

    let markup = view.regions().result_markup.expect("result should be rendered");
    assert_eq!(markup.matches("New York, US").count(), 1);
    assert_eq!(markup.matches("75.2°F").count(), 1);
    assert!(!view.regions().spinner_visible);
}

#[tokio::test]
async fn unreachable_backend_shows_connectivity_error() {
    // nothing listens on port 9 on test hosts
    let backend = HttpBackend::new("http://127.0.0.1:9", None).unwrap();
    let view = Arc::new(MemoryView::with_location("Oslo"));
    let ctl = ViewController::new(backend, Arc::clone(&view), ControllerSettings::default());

    let err = ctl.fetch_weather().await.unwrap_err();

    assert!(matches!(err, PanelError::Transport(_)));
    assert!(view.regions().error_visible);
    assert_eq!(view.location_value(), "Oslo");
}
