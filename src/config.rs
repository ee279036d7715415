// Runtime configuration assembled from CLI flags and environment.
// The documented contract has no config file; everything lives here.

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";
pub const WHISPER_MODEL: &str = "whisper-1";
pub const TRANSLATION_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key used by both the transcription and translation clients
    pub api_key: String,
    /// Base URL of the API; overridable so tests can point at a local server
    pub api_base: String,
    pub whisper_model: String,
    pub translation_model: String,
    /// Per-request timeout for the translation call
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            whisper_model: WHISPER_MODEL.to_string(),
            translation_model: TRANSLATION_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}
