// Domain models module
// Contains core data structures used throughout the application

use serde::{Deserialize, Serialize};

/// A single video to process. Created when the user submits a batch and
/// never mutated afterwards; `index` is 1-based and stable for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoJob {
    pub url: String,
    pub index: usize,
}

impl VideoJob {
    pub fn new(url: impl Into<String>, index: usize) -> Self {
        Self {
            url: url.into(),
            index,
        }
    }
}

/// The finished output for one video: the Arabic transcript and its English
/// translation. `index` matches the originating job and is the join key used
/// by the presenter and the export packager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    pub url: String,
    pub index: usize,
    pub arabic: String,
    pub english: String,
}

/// Mutable session state for one batch run. Mutation goes through the
/// methods below; `processing` gates re-entrant submission while a run is
/// in flight.
#[derive(Debug, Default)]
pub struct BatchState {
    jobs: Vec<VideoJob>,
    results: Vec<VideoResult>,
    processing: bool,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run: replaces the job list, clears prior results and
    /// marks the batch as in flight.
    pub fn begin(&mut self, jobs: Vec<VideoJob>) {
        self.jobs = jobs;
        self.results.clear();
        self.processing = true;
    }

    /// Record a completed video. Results arrive in job order because
    /// processing is strictly sequential.
    pub fn push_result(&mut self, result: VideoResult) {
        debug_assert!(self.processing, "result recorded outside of a run");
        self.results.push(result);
    }

    pub fn finish(&mut self) {
        self.processing = false;
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn jobs(&self) -> &[VideoJob] {
        &self.jobs
    }

    pub fn results(&self) -> &[VideoResult] {
        &self.results
    }
}
