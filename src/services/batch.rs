use log::{info, warn};
use tokio::sync::mpsc;

use crate::errors::{AppError, AppResult};
use crate::events::PipelineProgress;
use crate::models::{BatchState, VideoJob, VideoResult};
use crate::services::pipeline::PipelineRunner;

/// One job that did not produce a result, with the user-facing reason.
#[derive(Debug, Clone)]
pub struct JobFailure {
    pub index: usize,
    pub url: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failures: Vec<JobFailure>,
}

/// Drives the pipeline over a URL list, strictly sequentially. A failed job
/// is recorded and skipped; the batch always runs to the end.
pub struct BatchController {
    state: BatchState,
    runner: PipelineRunner,
}

impl BatchController {
    pub fn new(runner: PipelineRunner) -> Self {
        Self {
            state: BatchState::new(),
            runner,
        }
    }

    pub fn state(&self) -> &BatchState {
        &self.state
    }

    pub fn results(&self) -> &[VideoResult] {
        self.state.results()
    }

    pub async fn run(
        &mut self,
        urls: &[String],
        progress: Option<mpsc::Sender<PipelineProgress>>,
    ) -> AppResult<BatchSummary> {
        if self.state.is_processing() {
            return Err(AppError::Validation(
                "a batch is already being processed".to_string(),
            ));
        }

        let jobs: Vec<VideoJob> = urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .enumerate()
            .map(|(i, url)| VideoJob::new(url, i + 1))
            .collect();

        if jobs.is_empty() {
            return Err(AppError::Validation(
                "at least one video URL is required".to_string(),
            ));
        }

        let total = jobs.len();
        info!("Starting batch of {} video(s)", total);
        self.state.begin(jobs.clone());

        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };

        for job in &jobs {
            info!("Processing video {}/{}: {}", job.index, total, job.url);
            match self.runner.process(job, progress.as_ref()).await {
                Ok(result) => {
                    self.state.push_result(result);
                    summary.completed += 1;
                }
                Err(e) => {
                    warn!("Video {} failed: {}", job.index, e);
                    summary.failures.push(JobFailure {
                        index: job.index,
                        url: job.url.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        self.state.finish();
        info!(
            "Batch finished: {}/{} completed, {} failed",
            summary.completed,
            total,
            summary.failures.len()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::services::download::MediaDownloader;
    use crate::services::transcription::SpeechRecognizer;
    use crate::services::translation::Translator;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    struct NoopFetcher;

    #[async_trait]
    impl MediaDownloader for NoopFetcher {
        async fn fetch(&self, _url: &str, dest_stem: &Path) -> crate::errors::AppResult<PathBuf> {
            let path = dest_stem.with_extension("m4a");
            tokio::fs::write(&path, b"audio").await?;
            Ok(path)
        }
    }

    struct NoopRecognizer;

    #[async_trait]
    impl SpeechRecognizer for NoopRecognizer {
        async fn transcribe(
            &self,
            _media_path: &Path,
            _language: &str,
        ) -> crate::errors::AppResult<String> {
            Ok("نص".to_string())
        }
    }

    struct NoopTranslator;

    #[async_trait]
    impl Translator for NoopTranslator {
        async fn translate(&self, _text: &str, _source: &str, _target: &str) -> String {
            "text".to_string()
        }
    }

    fn controller() -> BatchController {
        BatchController::new(PipelineRunner::new(
            Arc::new(NoopFetcher),
            Arc::new(NoopRecognizer),
            Arc::new(NoopTranslator),
        ))
    }

    #[tokio::test]
    async fn rejects_run_while_batch_in_flight() {
        let mut controller = controller();
        controller
            .state
            .begin(vec![VideoJob::new("https://example.com/1", 1)]);

        let err = controller
            .run(&["https://example.com/2".to_string()], None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // The in-flight state is untouched by the rejected submission
        assert!(controller.state.is_processing());
        assert_eq!(controller.state.jobs().len(), 1);
    }

    #[tokio::test]
    async fn blank_lines_are_dropped_before_indexing() {
        let mut controller = controller();
        let urls = vec![
            "  ".to_string(),
            "https://example.com/a".to_string(),
            String::new(),
            "https://example.com/b".to_string(),
        ];
        let summary = controller.run(&urls, None).await.unwrap();
        assert_eq!(summary.total, 2);
        let indices: Vec<usize> = controller.results().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }
}
