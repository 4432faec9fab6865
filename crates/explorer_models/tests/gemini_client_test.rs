//! Tests for the Gemini client against a local mock server.
//!
//! Run with: cargo test --package explorer_models

#![cfg(feature = "gemini")]

use explorer_core::{FileState, GenerateRequest, GenerationParameters, UploadedAsset};
use explorer_error::{GenerationErrorKind, UploadErrorKind};
use explorer_interface::{FileStore, GenerativeDriver};
use explorer_models::GeminiClient;
use futures_util::StreamExt;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key", "gemini-2.5-flash").with_base_url(server.uri())
}

fn finance_request() -> GenerateRequest {
    GenerateRequest::builder()
        .prompt("What is inflation?")
        .parameters(GenerationParameters::new(0.7, 0.95, 40))
        .build()
        .expect("request")
}

fn sse_body(events: &[serde_json::Value]) -> String {
    events
        .iter()
        .map(|event| format!("data: {}\r\n\r\n", event))
        .collect()
}

fn text_event(text: &str) -> serde_json::Value {
    json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
}

#[tokio::test]
async fn test_stream_yields_chunks_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    let body = sse_body(&[
        text_event("Inflation "),
        text_event("is "),
        text_event("a rise in prices."),
        json!({"candidates": [{"finishReason": "STOP"}]}),
    ]);
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.generate_stream(&finance_request()).await?;

    let mut chunks = Vec::new();
    while let Some(item) = stream.next().await {
        chunks.push(item?);
    }

    assert_eq!(chunks, vec!["Inflation ", "is ", "a rise in prices."]);
    Ok(())
}

#[tokio::test]
async fn test_stream_sends_generation_config() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:streamGenerateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&[text_event("ok")]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.generate_stream(&finance_request()).await?;
    while stream.next().await.is_some() {}

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body)?;
    assert_eq!(body["generationConfig"]["topK"], 40);
    assert_eq!(body["contents"][0]["parts"][0]["text"], "What is inflation?");
    Ok(())
}

#[tokio::test]
async fn test_error_status_surfaces_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = match client.generate_stream(&finance_request()).await {
        Ok(_) => panic!("429 should fail before streaming"),
        Err(e) => e,
    };

    assert!(matches!(
        err.kind(),
        GenerationErrorKind::Http { status_code: 429, .. }
    ));
    assert_eq!(err.kind().user_message(), "quota exceeded");
}

#[tokio::test]
async fn test_silent_server_times_out_the_stream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:streamGenerateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&[text_event("late")]), "text/event-stream")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).with_read_timeout(Duration::from_millis(200));
    let err = match client.generate_stream(&finance_request()).await {
        Ok(_) => panic!("a silent server should not produce a stream"),
        Err(e) => e,
    };

    assert!(matches!(err.kind(), GenerationErrorKind::Timeout(_)));
}

#[tokio::test]
async fn test_blocked_event_ends_stream_with_error() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    let body = sse_body(&[
        text_event("Partial"),
        json!({"candidates": [{"finishReason": "SAFETY"}]}),
    ]);
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.generate_stream(&finance_request()).await?;

    assert_eq!(stream.next().await.transpose()?, Some("Partial".to_string()));
    let err = stream
        .next()
        .await
        .expect("an error item")
        .expect_err("blocked");
    assert!(matches!(err.kind(), GenerationErrorKind::Blocked(_)));
    assert!(stream.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_generate_returns_complete_text() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Inflation is "}, {"text": "a rise in prices."}]},
                            "finishReason": "STOP"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client.generate(&finance_request()).await?;

    assert_eq!(text, "Inflation is a rise in prices.");
    Ok(())
}

#[tokio::test]
async fn test_upload_uses_resumable_session() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .and(header("X-Goog-Upload-Command", "start"))
        .and(header("X-Goog-Upload-Header-Content-Type", "application/pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-goog-upload-url", format!("{}/upload-session/1", server.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload-session/1"))
        .and(header("X-Goog-Upload-Offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file": {"name": "files/report", "mimeType": "application/pdf",
                     "uri": "https://files/report", "state": "PROCESSING"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let asset = UploadedAsset::new("report.pdf", "application/pdf", b"%PDF-1.7".to_vec());
    let handle = client.upload(&asset).await?;

    assert_eq!(handle.name(), "files/report");
    assert_eq!(handle.uri(), "https://files/report");
    assert_eq!(*handle.state(), FileState::Processing);
    Ok(())
}

#[tokio::test]
async fn test_get_file_reports_state() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/files/report"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "files/report", "mimeType": "application/pdf",
            "uri": "https://files/report", "state": "ACTIVE"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handle = client.get_file("files/report").await?;

    assert!(handle.is_active());
    Ok(())
}

#[tokio::test]
async fn test_upload_rejection_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "API key not valid"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let asset = UploadedAsset::new("a.png", "image/png", vec![1, 2, 3]);
    let err = client.upload(&asset).await.expect_err("403");

    assert_eq!(
        err.kind(),
        &UploadErrorKind::Remote {
            status_code: 403,
            message: "API key not valid".to_string()
        }
    );
}
