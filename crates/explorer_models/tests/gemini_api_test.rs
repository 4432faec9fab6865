//! Live tests against the Gemini API.
//!
//! Require `GOOGLE_API_KEY` in the environment or a `.env` file.
//!
//! Run with: cargo test --package explorer_models --features api -- --ignored

#![cfg(all(feature = "gemini", feature = "api"))]

use explorer_core::GenerateRequest;
use explorer_interface::GenerativeDriver;
use explorer_models::{DEFAULT_MODEL, GeminiClient};
use futures_util::StreamExt;

fn live_client() -> anyhow::Result<GeminiClient> {
    let _ = dotenvy::dotenv();
    let key = std::env::var("GOOGLE_API_KEY")?;
    Ok(GeminiClient::new(key, DEFAULT_MODEL))
}

#[tokio::test]
#[ignore] // Requires a real API key
async fn test_live_streaming_answer() -> anyhow::Result<()> {
    let client = live_client()?;
    let request = GenerateRequest::builder()
        .prompt("Reply with the single word: pong")
        .build()?;

    let mut stream = client.generate_stream(&request).await?;
    let mut answer = String::new();
    while let Some(chunk) = stream.next().await {
        answer.push_str(&chunk?);
    }

    assert!(answer.to_lowercase().contains("pong"));
    Ok(())
}
