use async_trait::async_trait;
use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Translates text between languages. Infallible outward: implementations
/// return degraded fallback text rather than an error, so a translation
/// problem never aborts a job the way a download or transcription failure
/// does.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> String;
}

// Chat message structure for the completions API
#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct TranslationRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

static TRANSLATION_CLIENT: OnceCell<Arc<GptTranslator>> = OnceCell::new();

/// Chat-completions backed translator, one instance per process.
pub struct GptTranslator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    request_timeout: Duration,
}

impl GptTranslator {
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
            endpoint: format!("{}/v1/chat/completions", config.api_base),
            model: config.translation_model.clone(),
            request_timeout: config.request_timeout,
        }
    }

    /// Process-wide instance, initialized lazily and never torn down.
    pub fn shared(config: &Config) -> Arc<Self> {
        TRANSLATION_CLIENT
            .get_or_init(|| Arc::new(Self::new(config)))
            .clone()
    }

    async fn request_translation(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> AppResult<String> {
        let request = TranslationRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system_prompt(source_language, target_language),
                },
                Message {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: 0.3,
        };

        debug!("Sending translation request to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        debug!("Translation API response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api(format!(
                "translation request failed (HTTP {}): {}",
                status,
                body.trim()
            )));
        }

        let completion: ChatCompletion = response.json().await?;
        let translated = completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| AppError::Api("translation response had no choices".to_string()))?;

        info!("Translation completed ({} characters)", translated.len());
        Ok(translated)
    }
}

fn system_prompt(source_language: &str, target_language: &str) -> String {
    format!(
        "You are a professional translator. \
        Translate the following transcript from {} into {}. \
        Keep the translation natural and accurate. \
        ONLY include the translated text in your response.",
        source_language, target_language
    )
}

#[async_trait]
impl Translator for GptTranslator {
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> String {
        match self
            .request_translation(text, source_language, target_language)
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                // Degrade instead of failing the job: the result carries the
                // error message where the translation would have been.
                error!("Translation failed: {}", e);
                format!("Translation failed: {}", e)
            }
        }
    }
}
