use async_trait::async_trait;
use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Converts a local media file into text. The pipeline depends on this trait;
/// the production implementation calls the Whisper API.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe `media_path`, constrained to the given language code.
    async fn transcribe(&self, media_path: &Path, language: &str) -> AppResult<String>;
}

static WHISPER_CLIENT: OnceCell<Arc<WhisperClient>> = OnceCell::new();

/// Whisper API client. Loading the speech model is the backend's concern;
/// on this side the expensive part is client construction, done once per
/// process and reused for every job.
pub struct WhisperClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl WhisperClient {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("arascribe/0.1")
            .build()
            .unwrap_or_else(|e| {
                warn!("Could not create custom HTTP client, using default: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/v1/audio/transcriptions", config.api_base),
            model: config.whisper_model.clone(),
        }
    }

    /// Process-wide instance, initialized on first use and reused across all
    /// jobs. The first caller's configuration wins; there is no teardown.
    pub fn shared(config: &Config) -> Arc<Self> {
        WHISPER_CLIENT
            .get_or_init(|| Arc::new(Self::new(config)))
            .clone()
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperClient {
    async fn transcribe(&self, media_path: &Path, language: &str) -> AppResult<String> {
        info!("Starting transcription of {}", media_path.display());

        if self.api_key.trim().is_empty() {
            error!("OpenAI API key is empty");
            return Err(AppError::Transcription(
                "OpenAI API key is required for transcription".to_string(),
            ));
        }

        let file_content = tokio::fs::read(media_path)
            .await
            .map_err(|e| AppError::Transcription(format!("failed to read media file: {}", e)))?;
        let filename = media_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.m4a".to_string());
        debug!("Uploading {} ({} bytes)", filename, file_content.len());

        let file_part = Part::bytes(file_content)
            .file_name(filename)
            .mime_str("application/octet-stream")
            .map_err(|e| AppError::Transcription(e.to_string()))?;
        let form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "text")
            .text("language", language.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Transcription(format!("request failed: {}", e)))?;

        let status = response.status();
        debug!("Whisper API response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transcription(format!(
                "API request failed (HTTP {}): {}",
                status,
                body.trim()
            )));
        }

        // With response_format=text the body is the transcript itself
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Transcription(format!("failed to read response: {}", e)))?;

        info!("Transcription completed ({} characters)", text.len());
        Ok(text.trim().to_string())
    }
}
