//! Speech-to-text client for the OpenAI transcription API.
//!
//! A hard dependency of the voice pipeline: failure here aborts the run
//! and no entry is created.

use std::path::Path;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const TRANSCRIPTION_MODEL: &str = "whisper-1";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for `/audio/transcriptions` (whisper-1).
#[derive(Clone)]
pub struct SpeechToText {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SpeechToText {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENAI_API_BASE.to_string())
    }

    /// Points the client at an alternate API base. Used by tests to target
    /// a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url,
        }
    }

    /// Uploads the audio file and returns the plain-text transcript.
    pub async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let file_name = audio_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let file_bytes = tokio::fs::read(audio_path)
            .await
            .context("Failed to read audio file")?;

        let file_part = Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str("audio/ogg")?;

        let form = Form::new()
            .part("file", file_part)
            .text("model", TRANSCRIPTION_MODEL);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Failed to call transcription API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Transcription API error (status {status}): {body}");
        }

        let transcription: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;

        Ok(transcription.text.trim().to_string())
    }
}
