use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vf_core::{ConversionJobId, VideoId};

/// A queued or in-flight conversion job.
///
/// Jobs are transient: they live in the queue while pending or running and
/// in a bounded history ring once terminal. They are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    pub id: ConversionJobId,
    pub video_id: VideoId,
    pub state: JobState,
    /// Variant indices whose encode finished, in ladder order.
    pub completed_renditions: Vec<u32>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Conversion job states.
///
/// The happy path walks the variants in declaration order; any state can
/// transition to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Preparing,
    Encoding,
    ManifestWriting,
    ThumbnailExtracting,
    Persisting,
    Completed,
    Failed,
}

impl JobState {
    /// Whether the job has finished (successfully or not).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Preparing => "preparing",
            JobState::Encoding => "encoding",
            JobState::ManifestWriting => "manifest_writing",
            JobState::ThumbnailExtracting => "thumbnail_extracting",
            JobState::Persisting => "persisting",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Handle returned to the enqueueing side: enough to poll for progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: ConversionJobId,
    pub state: JobState,
}

impl ConversionJob {
    pub fn new(video_id: VideoId) -> Self {
        Self {
            id: ConversionJobId::new(),
            video_id,
            state: JobState::Pending,
            completed_renditions: Vec::new(),
            error: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// The handle for this job in its current state.
    pub fn handle(&self) -> JobHandle {
        JobHandle {
            id: self.id,
            state: self.state,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
    }

    pub fn set_state(&mut self, state: JobState) {
        self.state = state;
    }

    pub fn record_rendition(&mut self, index: u32) {
        self.completed_renditions.push(index);
    }

    pub fn complete(&mut self) {
        self.state = JobState::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: &str) {
        self.state = JobState::Failed;
        self.error = Some(error.to_string());
        self.completed_at = Some(Utc::now());
    }
}
