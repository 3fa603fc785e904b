use std::time::Duration;

use mercodex::backend::{BackendError, BotReply, ChatBackend, HttpBackend};
use mercodex::core::types::Sender;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), Duration::from_secs(5))
}

async fn mount_send_reply(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/chatBot"))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// Send
// ============================================================================

#[tokio::test]
async fn test_send_posts_envelope_and_reads_bare_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chatBot"))
        .and(body_json(json!({
            "id_session": "s-1",
            "user_id": "U-123",
            "messages": [{"type": "user", "message": "Analyze the Pixel 8"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Solid camera, weak modem")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend_for(&server)
        .send_message("s-1", "U-123", "Analyze the Pixel 8")
        .await
        .unwrap();
    assert_eq!(reply, BotReply::Text("Solid camera, weak modem".into()));
}

#[tokio::test]
async fn test_send_prefers_message_over_reply() {
    let server = MockServer::start().await;
    mount_send_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"message": "from message", "reply": "from reply"})),
    )
    .await;

    let reply = backend_for(&server).send_message("s", "u", "hi").await.unwrap();
    assert_eq!(reply, BotReply::Message("from message".into()));
}

#[tokio::test]
async fn test_send_falls_back_to_reply_field() {
    let server = MockServer::start().await;
    mount_send_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"message": "", "reply": "from reply"})),
    )
    .await;

    let reply = backend_for(&server).send_message("s", "u", "hi").await.unwrap();
    assert_eq!(reply, BotReply::Reply("from reply".into()));
}

#[tokio::test]
async fn test_send_null_body_is_unrecognized() {
    let server = MockServer::start().await;
    mount_send_reply(&server, ResponseTemplate::new(200).set_body_json(json!(null))).await;

    let reply = backend_for(&server).send_message("s", "u", "hi").await.unwrap();
    assert_eq!(reply, BotReply::Unrecognized);
}

#[tokio::test]
async fn test_send_server_error_is_status_error() {
    let server = MockServer::start().await;
    mount_send_reply(&server, ResponseTemplate::new(500).set_body_string("boom")).await;

    let result = backend_for(&server).send_message("s", "u", "hi").await;
    match result {
        Err(BackendError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    mount_send_reply(&server, ResponseTemplate::new(200).set_body_string("not json {")).await;

    let result = backend_for(&server).send_message("s", "u", "hi").await;
    assert!(matches!(result, Err(BackendError::Decode(_))));
}

#[tokio::test]
async fn test_send_unreachable_is_network_error() {
    // Nothing listens on port 9 of the loopback
    let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(2));
    let result = backend.send_message("s", "u", "hi").await;
    assert!(matches!(result, Err(BackendError::Network(_))));
}

// ============================================================================
// Session list and history
// ============================================================================

#[tokio::test]
async fn test_list_sessions_normalizes_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chatBot/myHistory/U-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id_session": "a",
                "title": "Robot vacuums",
                "last_message": "Roomba vs Roborock",
                "timestamp": "2024-05-01T10:00:00Z"
            },
            {"id": 42, "preview": "hello"}
        ])))
        .mount(&server)
        .await;

    let sessions = backend_for(&server).list_sessions("U-123").await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, "a");
    assert_eq!(sessions[0].title, "Robot vacuums");
    assert_eq!(sessions[0].preview, "Roomba vs Roborock");
    assert_eq!(sessions[0].timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    assert_eq!(sessions[1].id, "42");
    assert_eq!(sessions[1].preview, "hello");
}

#[tokio::test]
async fn test_list_sessions_rejects_non_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chatBot/myHistory/U-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessions": []})))
        .mount(&server)
        .await;

    let result = backend_for(&server).list_sessions("U-123").await;
    assert!(matches!(result, Err(BackendError::Decode(_))));
}

#[tokio::test]
async fn test_history_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chatBot/history/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "user", "message": "Best budget phone?"},
            {"type": "bot", "text": "The Pixel 7a"}
        ])))
        .mount(&server)
        .await;

    let entries = backend_for(&server).session_history("a").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].sender, Sender::User);
    assert_eq!(entries[0].text, "Best budget phone?");
    assert_eq!(entries[1].sender, Sender::Bot);
    assert_eq!(entries[1].text, "The Pixel 7a");
}

#[tokio::test]
async fn test_history_accepts_messages_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chatBot/history/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"type": "user", "message": "hi"}]
        })))
        .mount(&server)
        .await;

    let entries = backend_for(&server).session_history("a").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].sender, Sender::User);
}

#[tokio::test]
async fn test_history_rejects_other_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chatBot/history/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("nope")))
        .mount(&server)
        .await;

    let result = backend_for(&server).session_history("a").await;
    assert!(matches!(result, Err(BackendError::Decode(_))));
}

#[tokio::test]
async fn test_history_not_found_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chatBot/history/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = backend_for(&server).session_history("gone").await;
    assert!(matches!(result, Err(BackendError::Status { status: 404, .. })));
}

// ============================================================================
// Reports and probe
// ============================================================================

#[tokio::test]
async fn test_download_report_returns_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/download/report_1.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .mount(&server)
        .await;

    let url = format!("{}/api/reports/download/report_1.pdf", server.uri());
    let bytes = backend_for(&server).download_report(&url).await.unwrap();
    assert_eq!(bytes, b"%PDF-1.7");
}

#[tokio::test]
async fn test_probe_reports_reachability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chatBot/myHistory/U-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(backend_for(&server).probe("U-123").await);
    assert!(!backend_for(&server).probe("someone-else").await);
}
