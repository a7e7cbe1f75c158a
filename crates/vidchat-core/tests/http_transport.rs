use std::time::Duration;

use serde_json::json;
use vidchat_core::session::Sender;
use vidchat_core::transport::{ChatRequest, HistoryEntry, HttpTransport, TransportErrorKind};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(message: &str, video_id: Option<&str>) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        video_id: video_id.map(str::to_string),
        history: vec![HistoryEntry {
            sender: Sender::User,
            message: message.to_string(),
        }],
    }
}

#[tokio::test]
async fn test_chat_posts_request_and_returns_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "message": "Hello",
            "video_id": "abc123",
            "history": [{"sender": "user", "message": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hi!"})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri(), None).unwrap();
    let reply = transport.chat(&request("Hello", Some("abc123"))).await.unwrap();
    assert_eq!(reply, "Hi!");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(format!("{}/", server.uri()), None).unwrap();
    assert_eq!(transport.base_url(), server.uri());
    assert_eq!(transport.chat(&request("x", None)).await.unwrap(), "ok");
}

#[tokio::test]
async fn test_non_success_status_is_http_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Video ID is required"})),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri(), None).unwrap();
    let err = transport.chat(&request("Hello", None)).await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::HttpStatus);
    assert_eq!(err.message, "HTTP 400: Video ID is required");
}

#[tokio::test]
async fn test_missing_response_field_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "Hi!"})))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri(), None).unwrap();
    let err = transport.chat(&request("Hello", None)).await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Parse);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "late"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri(), Some(Duration::from_millis(200))).unwrap();
    let err = transport.chat(&request("Hello", None)).await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Timeout);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let transport = HttpTransport::new("http://127.0.0.1:9", None).unwrap();
    let err = transport.chat(&request("Hello", None)).await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Network);
}

#[tokio::test]
async fn test_status_probe() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri(), None).unwrap();
    assert!(transport.check_status().await.is_ok());
}

#[tokio::test]
async fn test_status_probe_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri(), None).unwrap();
    let err = transport.check_status().await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::HttpStatus);
    assert_eq!(err.to_string(), "HTTP 503");
}
