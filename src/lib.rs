//! Batch pipeline that turns video URLs into Arabic transcripts and English
//! translations: media is fetched with yt-dlp, transcribed through the
//! Whisper API, translated with a chat model and bundled into a zip of text
//! files. Jobs run strictly sequentially and a failing video never aborts
//! the rest of the batch.

pub mod cli;
pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod output;
pub mod services;
pub mod utils;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use models::{BatchState, VideoJob, VideoResult};
