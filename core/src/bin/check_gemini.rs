//! Diagnostic binary for verifying Gemini API access
//! Runs one one-shot generation and one streamed chat reply against the
//! configured endpoint. This is a utility binary, not part of the main application.

use nox_coder_core::chat::ChatMessage;
use nox_coder_core::gemini::{AiProvider, GeminiClient};
use nox_coder_core::profile::{build_code_prompt, profile_for_version};
use nox_coder_core::{AppError, Config};
use tokio_stream::StreamExt;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    info!(gemini = ?config.gemini, "Loaded configuration");

    // 1. API key
    if !config.has_api_key() {
        warn!("GEMINI_API_KEY is not set; export it or set API_KEY");
        return Err(AppError::Config("GEMINI_API_KEY is not set".to_string()));
    }

    let client = GeminiClient::new(&config.gemini)?;
    let profile = profile_for_version(&config.default_version, &config.models);
    info!(version = %config.default_version, model = %profile.model, "Using profile");

    // 2. One-shot generation
    let prompt = build_code_prompt("Rust", "add two numbers");
    match client.generate_once(&profile.model, &prompt).await {
        Ok(text) => info!(response_len = text.len(), "One-shot generation succeeded:\n{}", text),
        Err(e) => {
            error!(error = %e, "One-shot generation failed");
            return Err(e.into());
        }
    }

    // 3. Streamed chat reply with one turn of history
    let history = vec![
        ChatMessage::user("Hi"),
        ChatMessage::model("Hello! How can I help?"),
    ];
    let handle = client.create_session(&profile.model, &profile.system_instruction, &history);
    let mut stream = client
        .stream_reply(&handle, "Who made you? Answer briefly.")
        .await?;

    let mut reply = String::new();
    let mut chunk_count = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        chunk_count += 1;
        reply.push_str(&chunk);
    }
    if reply.trim().is_empty() {
        return Err(anyhow::anyhow!("Stream ended after {} chunks without any text", chunk_count).into());
    }
    info!(chunk_count = chunk_count, "Streamed reply finished:\n{}", reply);

    info!("All checks completed");
    Ok(())
}
