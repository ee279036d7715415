// Events module
// Pipeline progress events and the advisory emission helper

use log::error;
use serde::Serialize;
use tokio::sync::mpsc;

/// Stages of the per-video pipeline, in order. `Failed` is terminal and only
/// reachable from `Downloading` or `Transcribing`; translation degrades to
/// fallback text instead of failing the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Start,
    Downloading,
    Transcribing,
    Translating,
    Done,
    Failed,
}

impl PipelineStage {
    /// Progress milestone reported when the stage is entered.
    pub fn percent(self) -> f32 {
        match self {
            PipelineStage::Start => 0.0,
            PipelineStage::Downloading => 10.0,
            PipelineStage::Transcribing => 40.0,
            PipelineStage::Translating => 70.0,
            PipelineStage::Done => 100.0,
            PipelineStage::Failed => 100.0,
        }
    }
}

/// Progress update for one job, sent over an mpsc channel to whatever is
/// rendering the batch (the CLI draws a progress bar from these).
#[derive(Debug, Clone, Serialize)]
pub struct PipelineProgress {
    pub index: usize,
    pub stage: PipelineStage,
    pub percent: f32,
    pub status: String,
}

impl PipelineProgress {
    pub fn new(index: usize, stage: PipelineStage, status: impl Into<String>) -> Self {
        Self {
            index,
            stage,
            percent: stage.percent(),
            status: status.into(),
        }
    }
}

/// Send a progress update if a channel is attached. Progress is advisory UI
/// feedback: a send failure is logged and never propagated to the pipeline.
pub async fn emit_progress(
    sender: Option<&mpsc::Sender<PipelineProgress>>,
    progress: PipelineProgress,
) {
    if let Some(sender) = sender {
        if let Err(e) = sender.send(progress).await {
            error!("Failed to send progress update: {}", e);
        }
    }
}
