// Services module
// Contains business logic separated by domain areas

pub mod batch; // Batch orchestration over the per-video pipeline
pub mod download; // Media download via yt-dlp
pub mod export; // Transcript bundle packaging
pub mod pipeline; // Per-video processing pipeline
pub mod transcription; // Speech-to-text service
pub mod translation; // Translation service
