use log::{error, info};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::errors::AppResult;
use crate::events::{emit_progress, PipelineProgress, PipelineStage};
use crate::models::{VideoJob, VideoResult};
use crate::services::download::MediaDownloader;
use crate::services::transcription::SpeechRecognizer;
use crate::services::translation::Translator;

/// Whisper language hint for the source speech
pub const SOURCE_LANGUAGE_CODE: &str = "ar";
pub const SOURCE_LANGUAGE: &str = "Arabic";
pub const TARGET_LANGUAGE: &str = "English";

/// Runs one video through download → transcription → translation. A failure
/// in download or transcription aborts the job; translation degrades inside
/// the translator and never does.
pub struct PipelineRunner {
    downloader: Arc<dyn MediaDownloader>,
    recognizer: Arc<dyn SpeechRecognizer>,
    translator: Arc<dyn Translator>,
}

impl PipelineRunner {
    pub fn new(
        downloader: Arc<dyn MediaDownloader>,
        recognizer: Arc<dyn SpeechRecognizer>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            downloader,
            recognizer,
            translator,
        }
    }

    pub async fn process(
        &self,
        job: &VideoJob,
        progress: Option<&mpsc::Sender<PipelineProgress>>,
    ) -> AppResult<VideoResult> {
        info!("=== Processing video {}: {} ===", job.index, job.url);
        emit_progress(
            progress,
            PipelineProgress::new(
                job.index,
                PipelineStage::Start,
                format!("Starting video {}", job.index),
            ),
        )
        .await;

        // The workspace and everything yt-dlp writes into it live exactly as
        // long as this call, on every exit path.
        let workspace = tempfile::tempdir()?;
        let dest_stem = workspace.path().join(format!("video_{}", job.index));

        emit_progress(
            progress,
            PipelineProgress::new(
                job.index,
                PipelineStage::Downloading,
                format!("Downloading video {}...", job.index),
            ),
        )
        .await;
        let media_path = match self.downloader.fetch(&job.url, &dest_stem).await {
            Ok(path) => path,
            Err(e) => {
                error!("Video {} download failed: {}", job.index, e);
                emit_progress(
                    progress,
                    PipelineProgress::new(
                        job.index,
                        PipelineStage::Failed,
                        format!("Video {} failed: {}", job.index, e),
                    ),
                )
                .await;
                return Err(e);
            }
        };

        emit_progress(
            progress,
            PipelineProgress::new(
                job.index,
                PipelineStage::Transcribing,
                format!("Transcribing video {}...", job.index),
            ),
        )
        .await;
        let arabic = match self
            .recognizer
            .transcribe(&media_path, SOURCE_LANGUAGE_CODE)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!("Video {} transcription failed: {}", job.index, e);
                emit_progress(
                    progress,
                    PipelineProgress::new(
                        job.index,
                        PipelineStage::Failed,
                        format!("Video {} failed: {}", job.index, e),
                    ),
                )
                .await;
                return Err(e);
            }
        };

        emit_progress(
            progress,
            PipelineProgress::new(
                job.index,
                PipelineStage::Translating,
                format!("Translating video {}...", job.index),
            ),
        )
        .await;
        let english = self
            .translator
            .translate(&arabic, SOURCE_LANGUAGE, TARGET_LANGUAGE)
            .await;

        emit_progress(
            progress,
            PipelineProgress::new(
                job.index,
                PipelineStage::Done,
                format!("Completed video {}!", job.index),
            ),
        )
        .await;
        info!("Video {} completed", job.index);

        Ok(VideoResult {
            url: job.url.clone(),
            index: job.index,
            arabic,
            english,
        })
    }
}
