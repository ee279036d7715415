// End-to-end batch behavior over stubbed download/transcription/translation
// backends: ordering, per-job failure isolation, translation degradation and
// input validation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use arascribe::errors::{AppError, AppResult};
use arascribe::events::{PipelineProgress, PipelineStage};
use arascribe::services::batch::BatchController;
use arascribe::services::download::MediaDownloader;
use arascribe::services::export;
use arascribe::services::pipeline::PipelineRunner;
use arascribe::services::transcription::SpeechRecognizer;
use arascribe::services::translation::Translator;

/// Writes a fake media file unless the URL contains "broken".
struct StubFetcher {
    calls: AtomicUsize,
}

impl StubFetcher {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MediaDownloader for StubFetcher {
    async fn fetch(&self, url: &str, dest_stem: &Path) -> AppResult<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("broken") {
            return Err(AppError::Download("connection reset".to_string()));
        }
        let path = dest_stem.with_extension("m4a");
        tokio::fs::write(&path, b"fake audio").await?;
        Ok(path)
    }
}

/// Echoes the media stem back as the "transcript"; can fail for one stem.
struct StubRecognizer {
    calls: AtomicUsize,
    fail_for_stem: Option<String>,
}

impl StubRecognizer {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_for_stem: None,
        }
    }

    fn failing_for(stem: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_for_stem: Some(stem.to_string()),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for StubRecognizer {
    async fn transcribe(&self, media_path: &Path, language: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(language, "ar");
        let stem = media_path
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .to_string();
        if self.fail_for_stem.as_deref() == Some(stem.as_str()) {
            return Err(AppError::Transcription("inference call raised".to_string()));
        }
        Ok(format!("نص {stem}"))
    }
}

struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        format!("[{source}->{target}] {text}")
    }
}

/// Behaves like a translator whose backend is down: always degrades.
struct DegradedTranslator;

#[async_trait]
impl Translator for DegradedTranslator {
    async fn translate(&self, _text: &str, _source: &str, _target: &str) -> String {
        "Translation failed: backend unavailable".to_string()
    }
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn results_cover_only_successful_jobs_in_order() {
    let fetcher = Arc::new(StubFetcher::new());
    let recognizer = Arc::new(StubRecognizer::new());
    let runner = PipelineRunner::new(fetcher.clone(), recognizer.clone(), Arc::new(EchoTranslator));
    let mut controller = BatchController::new(runner);

    let summary = controller
        .run(
            &urls(&["https://valid/1", "https://broken/2", "https://valid/3"]),
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.completed, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].index, 2);
    assert!(summary.failures[0].message.contains("connection reset"));

    let indices: Vec<usize> = controller.results().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 3]);
    assert!(!controller.state().is_processing());

    // The failed download never reached transcription
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fetch_failure_skips_all_downstream_stages() {
    let recognizer = Arc::new(StubRecognizer::new());
    let runner = PipelineRunner::new(
        Arc::new(StubFetcher::new()),
        recognizer.clone(),
        Arc::new(EchoTranslator),
    );
    let mut controller = BatchController::new(runner);

    let summary = controller
        .run(&urls(&["https://broken/only"]), None)
        .await
        .unwrap();

    assert_eq!(summary.completed, 0);
    assert!(controller.results().is_empty());
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transcription_failure_is_isolated_to_its_job() {
    let runner = PipelineRunner::new(
        Arc::new(StubFetcher::new()),
        Arc::new(StubRecognizer::failing_for("video_1")),
        Arc::new(EchoTranslator),
    );
    let mut controller = BatchController::new(runner);

    let summary = controller
        .run(&urls(&["https://valid/1", "https://valid/2"]), None)
        .await
        .unwrap();

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failures[0].index, 1);
    let indices: Vec<usize> = controller.results().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![2]);
}

#[tokio::test]
async fn degraded_translation_still_yields_a_result() {
    let runner = PipelineRunner::new(
        Arc::new(StubFetcher::new()),
        Arc::new(StubRecognizer::new()),
        Arc::new(DegradedTranslator),
    );
    let mut controller = BatchController::new(runner);

    let summary = controller.run(&urls(&["https://valid/1"]), None).await.unwrap();

    assert_eq!(summary.completed, 1);
    let result = &controller.results()[0];
    assert!(result.english.starts_with("Translation failed:"));
    assert!(result.arabic.contains("video_1"));
}

#[tokio::test]
async fn rerun_resets_previous_results() {
    let runner = PipelineRunner::new(
        Arc::new(StubFetcher::new()),
        Arc::new(StubRecognizer::new()),
        Arc::new(EchoTranslator),
    );
    let mut controller = BatchController::new(runner);

    controller
        .run(&urls(&["https://valid/a", "https://valid/b"]), None)
        .await
        .unwrap();
    assert_eq!(controller.results().len(), 2);

    controller
        .run(&urls(&["https://valid/c"]), None)
        .await
        .unwrap();

    assert_eq!(controller.results().len(), 1);
    assert_eq!(controller.results()[0].index, 1);
    assert_eq!(controller.results()[0].url, "https://valid/c");
}

#[tokio::test]
async fn empty_or_blank_input_is_rejected_without_side_effects() {
    let runner = PipelineRunner::new(
        Arc::new(StubFetcher::new()),
        Arc::new(StubRecognizer::new()),
        Arc::new(EchoTranslator),
    );
    let mut controller = BatchController::new(runner);

    let err = controller.run(&[], None).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = controller
        .run(&urls(&["   ", "", "\t"]), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(controller.results().is_empty());
    assert!(controller.state().jobs().is_empty());
    assert!(!controller.state().is_processing());
}

#[tokio::test]
async fn progress_reports_every_milestone_in_order() {
    let runner = PipelineRunner::new(
        Arc::new(StubFetcher::new()),
        Arc::new(StubRecognizer::new()),
        Arc::new(EchoTranslator),
    );
    let mut controller = BatchController::new(runner);

    let (tx, mut rx) = mpsc::channel::<PipelineProgress>(32);
    controller
        .run(&urls(&["https://valid/1"]), Some(tx))
        .await
        .unwrap();

    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }

    let stages: Vec<PipelineStage> = updates.iter().map(|u| u.stage).collect();
    assert_eq!(
        stages,
        vec![
            PipelineStage::Start,
            PipelineStage::Downloading,
            PipelineStage::Transcribing,
            PipelineStage::Translating,
            PipelineStage::Done,
        ]
    );
    let percents: Vec<f32> = updates.iter().map(|u| u.percent).collect();
    assert_eq!(percents, vec![0.0, 10.0, 40.0, 70.0, 100.0]);
    assert!(updates.iter().all(|u| u.index == 1));
}

#[tokio::test]
async fn exported_archive_matches_accumulated_results() {
    let runner = PipelineRunner::new(
        Arc::new(StubFetcher::new()),
        Arc::new(StubRecognizer::new()),
        Arc::new(EchoTranslator),
    );
    let mut controller = BatchController::new(runner);

    controller
        .run(&urls(&["https://valid/1", "https://valid/2"]), None)
        .await
        .unwrap();

    let bytes = export::package_results(controller.results()).unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 3 * controller.results().len());
}
