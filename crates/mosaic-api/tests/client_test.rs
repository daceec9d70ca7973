#![allow(clippy::unwrap_used)]
// Integration tests for `MosaicClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mosaic_api::{
    Error, ImageNotification, MosaicClient, Priority, RegisterDisplay, TextNotification,
    TlsMode, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MosaicClient) {
    let server = MockServer::start().await;
    let client = MosaicClient::new(&server.uri(), None, true).unwrap();
    (server, client)
}

fn ack() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true }))
}

// ── Status & auth ───────────────────────────────────────────────────

#[tokio::test]
async fn test_get_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "status": "running",
                "version": "1.4.0",
                "displays": 2
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let status = client.get_status().await.unwrap();
    assert_eq!(status.status.as_deref(), Some("running"));
    assert_eq!(status.version.as_deref(), Some("1.4.0"));
    assert_eq!(status.extra.get("displays"), Some(&json!(2)));
}

#[tokio::test]
async fn test_bearer_token_sent_when_configured() {
    let server = MockServer::start().await;
    let client = MosaicClient::new(
        &server.uri(),
        Some(SecretString::from("token-123".to_string())),
        true,
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.get_status().await.unwrap();
}

// ── Displays ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_displays_list() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/displays"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "lobby",
                "name": "Lobby",
                "width": 128,
                "height": 64,
                "brightness": 55,
                "power": true,
                "current_app": "clock",
                "rotation_enabled": false
            },
            { "id": "kitchen" }
        ])))
        .mount(&server)
        .await;

    let displays = client.get_displays().await.unwrap();

    assert_eq!(displays.len(), 2);
    assert_eq!(displays[0].id, "lobby");
    assert_eq!(displays[0].width, 128);
    assert_eq!(displays[0].brightness, 55);
    assert_eq!(displays[0].current_app.as_deref(), Some("clock"));
    assert!(!displays[0].rotation_enabled);
    assert_eq!(displays[1].name, "Mosaic");
    assert_eq!(displays[1].brightness, 80);
}

#[tokio::test]
async fn test_get_displays_tolerates_null_and_mistyped_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/displays"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "lobby" },
            { "id": "hall", "brightness": null, "name": null, "width": 12.5, "power": "on" }
        ])))
        .mount(&server)
        .await;

    let displays = client.get_displays().await.unwrap();

    assert_eq!(displays.len(), 2);
    assert_eq!(displays[1].id, "hall");
    assert_eq!(displays[1].brightness, 80);
    assert_eq!(displays[1].name, "Mosaic");
    assert_eq!(displays[1].width, 64);
    assert!(displays[1].power);
}

#[tokio::test]
async fn test_register_display() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/displays"))
        .and(body_json(json!({
            "id": "hall",
            "name": "Hall",
            "width": 64,
            "height": 32,
            "client_type": "web"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "hall", "name": "Hall" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .register_display(&RegisterDisplay::new("hall", "Hall"))
        .await
        .unwrap();
    assert_eq!(created.id, "hall");
}

#[tokio::test]
async fn test_get_display() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/displays/lobby"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "lobby", "power": false })),
        )
        .mount(&server)
        .await;

    let display = client.get_display("lobby").await.unwrap();
    assert!(!display.power);
}

#[tokio::test]
async fn test_set_power_sends_partial_update() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/displays/lobby"))
        .and(body_json(json!({ "power": false })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    client.set_power("lobby", false).await.unwrap();
}

#[tokio::test]
async fn test_set_brightness_sends_partial_update() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/displays/lobby"))
        .and(body_json(json!({ "brightness": 42 })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    client.set_brightness("lobby", 42).await.unwrap();
}

// ── Rotation ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_rotation_config() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/displays/lobby/rotation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enabled": false,
            "dwell_seconds": 15,
            "apps": ["clock", "weather"]
        })))
        .mount(&server)
        .await;

    let rotation = client.get_rotation_config("lobby").await.unwrap();
    assert!(!rotation.enabled);
    assert_eq!(rotation.dwell_seconds, Some(15));
    assert_eq!(rotation.apps, ["clock", "weather"]);
}

#[tokio::test]
async fn test_set_rotation_enabled() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/displays/lobby/rotation"))
        .and(body_json(json!({ "enabled": true })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    client.set_rotation_enabled("lobby", true).await.unwrap();
}

#[tokio::test]
async fn test_skip_app_accepts_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/displays/lobby/rotation/skip"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client.skip_app("lobby").await.unwrap();
    assert!(ack.is_null());
}

#[tokio::test]
async fn test_show_app() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/displays/lobby/rotation/show-app"))
        .and(body_json(json!({ "app": "weather", "duration": 30 })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    client.show_app("lobby", "weather", 30).await.unwrap();
}

// ── Notifications ───────────────────────────────────────────────────

#[tokio::test]
async fn test_push_text() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/notify"))
        .and(body_json(json!({
            "display": "all",
            "type": "text",
            "text": "Hello",
            "duration": 10,
            "priority": "normal",
            "color": "#FFFFFF",
            "font": "default"
        })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    client
        .push_text(&TextNotification {
            display: "all".into(),
            text: "Hello".into(),
            duration: 10,
            priority: Priority::Normal,
            color: Some("#FFFFFF".into()),
            font: Some("default".into()),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_push_image() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/notify"))
        .and(body_json(json!({
            "display": "lobby",
            "type": "image",
            "image": "https://example.com/cat.gif",
            "duration": 5,
            "priority": "sticky"
        })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    client
        .push_image(&ImageNotification {
            display: "lobby".into(),
            image: "https://example.com/cat.gif".into(),
            duration: 5,
            priority: Priority::Sticky,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_clear() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/notify"))
        .and(query_param("display", "lobby"))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    client.clear("lobby").await.unwrap();
}

// ── Frame ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_frame_returns_raw_bytes() {
    let (server, client) = setup().await;
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    Mock::given(method("GET"))
        .and(path("/frame"))
        .and(query_param("display", "lobby"))
        .and(query_param("format", "png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
        .mount(&server)
        .await;

    let frame = client.get_frame("lobby", "png").await.unwrap();
    assert_eq!(frame.as_ref(), png.as_slice());
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_non_200_carries_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/displays/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("display not found"))
        .mount(&server)
        .await;

    let err = client.get_display("ghost").await.unwrap_err();
    assert!(
        matches!(err, Error::Status { status: 404, .. }),
        "expected Status error, got: {err:?}"
    );
    let message = err.to_string();
    assert!(message.contains("404"), "{message}");
    assert!(message.contains("display not found"), "{message}");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_other_2xx_is_still_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/displays/lobby/rotation/skip"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = client.skip_app("lobby").await.unwrap_err();
    assert_eq!(err.status(), Some(204));
    assert!(err.to_string().contains("204"));
}

#[tokio::test]
async fn test_timeout_is_distinguished_from_connection_failure() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout: Duration::from_millis(200),
    };
    let client = MosaicClient::with_transport(&server.uri(), None, transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
    assert!(!err.is_connect());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop a listener to get a port nothing is serving on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = MosaicClient::new(&format!("http://127.0.0.1:{port}"), None, true).unwrap();

    let err = client.get_status().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(err.is_connect());
    assert!(!err.is_timeout());
    assert!(err.to_string().starts_with("Connection error"));
}

#[tokio::test]
async fn test_malformed_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/displays/lobby/rotation"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.get_rotation_config("lobby").await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body.contains("oops")),
        "got: {err:?}"
    );
}

// ── Pool lifecycle ──────────────────────────────────────────────────

#[tokio::test]
async fn test_close_is_idempotent_and_pool_rebuilds() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    assert!(!client.is_open());
    client.get_status().await.unwrap();
    assert!(client.is_open());

    client.close();
    assert!(!client.is_open());
    client.close();
    assert!(!client.is_open());

    client.get_status().await.unwrap();
    assert!(client.is_open());
}

#[tokio::test]
async fn test_concurrent_requests_share_the_pool() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/displays/lobby/rotation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "apps": [] })))
        .expect(3)
        .mount(&server)
        .await;

    let (a, b, c) = tokio::join!(
        client.get_rotation_config("lobby"),
        client.get_rotation_config("lobby"),
        client.get_rotation_config("lobby"),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
}
