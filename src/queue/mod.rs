//! Job queue adapter: the boundary between job producers and workers.
//!
//! Producers call [`JobQueue::enqueue`] and observe progress with
//! [`JobQueue::poll`]; workers drive the rest of the surface. The in-memory
//! implementation holds a per-video lease while a job is pending or running,
//! so a duplicate enqueue for the same video returns the in-flight handle
//! instead of racing a second job onto the same output directory.

mod types;

pub use types::{ConversionJob, JobHandle, JobState};

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;

use vf_core::events::{EventBus, EventPayload};
use vf_core::{ConversionJobId, Result, VideoId};

/// Maximum number of terminal jobs retained for polling.
const MAX_HISTORY_SIZE: usize = 256;

/// The queue surface. Producers use `enqueue`/`poll`; workers use the rest.
pub trait JobQueue: Send + Sync {
    /// Queue a conversion for the given video, or return the handle of the
    /// job already in flight for it.
    fn enqueue(&self, video_id: VideoId) -> Result<JobHandle>;

    /// Current state of a job, if it is still known to the queue.
    fn poll(&self, id: ConversionJobId) -> Option<JobState>;

    /// Full job record (active or recent history).
    fn get(&self, id: ConversionJobId) -> Option<ConversionJob>;

    /// Take the next pending job, marking it started.
    fn dequeue(&self) -> Option<ConversionJob>;

    /// Record that a job has entered a pipeline stage.
    fn set_state(&self, id: ConversionJobId, state: JobState);

    /// Record a finished rendition encode.
    fn record_rendition(&self, id: ConversionJobId, index: u32);

    /// Mark a job completed, releasing its video lease.
    fn complete(&self, id: ConversionJobId);

    /// Mark a job failed, releasing its video lease.
    fn fail(&self, id: ConversionJobId, error: &str);
}

/// In-process queue with FIFO delivery and per-video leases.
pub struct MemoryJobQueue {
    jobs: RwLock<HashMap<ConversionJobId, ConversionJob>>,
    pending: RwLock<VecDeque<ConversionJobId>>,
    history: RwLock<VecDeque<ConversionJob>>,
    /// Video ids with a job in flight, mapped to that job.
    leases: RwLock<HashMap<VideoId, ConversionJobId>>,
    events: Arc<EventBus>,
}

impl MemoryJobQueue {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            pending: RwLock::new(VecDeque::new()),
            history: RwLock::new(VecDeque::new()),
            leases: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Number of jobs waiting to be dequeued.
    pub fn pending_len(&self) -> usize {
        self.pending.read().len()
    }

    /// Recent terminal jobs, newest first.
    pub fn history(&self, limit: usize) -> Vec<ConversionJob> {
        let history = self.history.read();
        history.iter().take(limit).cloned().collect()
    }

    /// Move a terminal job out of the active map, releasing its lease.
    fn retire(&self, job: ConversionJob) {
        {
            let mut leases = self.leases.write();
            // Release only if this job still holds the lease.
            if leases.get(&job.video_id) == Some(&job.id) {
                leases.remove(&job.video_id);
            }
        }

        {
            let mut jobs = self.jobs.write();
            jobs.remove(&job.id);
        }

        let mut history = self.history.write();
        history.push_front(job);
        while history.len() > MAX_HISTORY_SIZE {
            history.pop_back();
        }
    }
}

impl JobQueue for MemoryJobQueue {
    fn enqueue(&self, video_id: VideoId) -> Result<JobHandle> {
        // The lease lock is held across the whole admission so concurrent
        // enqueues for one video cannot both pass the dedupe check.
        let mut leases = self.leases.write();

        if let Some(existing_id) = leases.get(&video_id) {
            let jobs = self.jobs.read();
            if let Some(existing) = jobs.get(existing_id) {
                tracing::info!(
                    video_id = %video_id,
                    job_id = %existing.id,
                    "Conversion already in flight; returning existing job"
                );
                return Ok(existing.handle());
            }
        }

        let job = ConversionJob::new(video_id);
        let handle = job.handle();
        leases.insert(video_id, job.id);

        {
            let mut jobs = self.jobs.write();
            jobs.insert(job.id, job.clone());
        }
        {
            let mut pending = self.pending.write();
            pending.push_back(job.id);
        }
        drop(leases);

        self.events.broadcast(EventPayload::JobQueued {
            job_id: job.id,
            video_id,
        });

        Ok(handle)
    }

    fn poll(&self, id: ConversionJobId) -> Option<JobState> {
        self.get(id).map(|job| job.state)
    }

    fn get(&self, id: ConversionJobId) -> Option<ConversionJob> {
        {
            let jobs = self.jobs.read();
            if let Some(job) = jobs.get(&id) {
                return Some(job.clone());
            }
        }
        let history = self.history.read();
        history.iter().find(|job| job.id == id).cloned()
    }

    fn dequeue(&self) -> Option<ConversionJob> {
        let id = {
            let mut pending = self.pending.write();
            pending.pop_front()?
        };

        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(&id)?;
        job.start();

        self.events.broadcast(EventPayload::JobStarted {
            job_id: job.id,
            video_id: job.video_id,
        });

        Some(job.clone())
    }

    fn set_state(&self, id: ConversionJobId, state: JobState) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(&id) {
            job.set_state(state);
            self.events.broadcast(EventPayload::JobStage {
                job_id: job.id,
                video_id: job.video_id,
                stage: state.to_string(),
            });
        }
    }

    fn record_rendition(&self, id: ConversionJobId, index: u32) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(&id) {
            job.record_rendition(index);
        }
    }

    fn complete(&self, id: ConversionJobId) {
        let job = {
            let mut jobs = self.jobs.write();
            match jobs.get_mut(&id) {
                Some(job) => {
                    job.complete();
                    job.clone()
                }
                None => return,
            }
        };

        self.events.broadcast(EventPayload::JobCompleted {
            job_id: job.id,
            video_id: job.video_id,
        });

        self.retire(job);
    }

    fn fail(&self, id: ConversionJobId, error: &str) {
        let job = {
            let mut jobs = self.jobs.write();
            match jobs.get_mut(&id) {
                Some(job) => {
                    job.fail(error);
                    job.clone()
                }
                None => return,
            }
        };

        self.events.broadcast(EventPayload::JobFailed {
            job_id: job.id,
            video_id: job.video_id,
            error: error.to_string(),
        });

        self.retire(job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> MemoryJobQueue {
        MemoryJobQueue::new(Arc::new(EventBus::default()))
    }

    #[test]
    fn enqueue_then_dequeue_fifo() {
        let q = queue();
        let a = q.enqueue(VideoId::new()).unwrap();
        let b = q.enqueue(VideoId::new()).unwrap();

        assert_eq!(q.dequeue().unwrap().id, a.id);
        assert_eq!(q.dequeue().unwrap().id, b.id);
        assert!(q.dequeue().is_none());
    }

    #[test]
    fn duplicate_enqueue_returns_in_flight_handle() {
        let q = queue();
        let video_id = VideoId::new();

        let first = q.enqueue(video_id).unwrap();
        assert_eq!(first.state, JobState::Pending);

        let second = q.enqueue(video_id).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(q.pending_len(), 1);
    }

    #[test]
    fn lease_released_on_terminal_state() {
        let q = queue();
        let video_id = VideoId::new();

        let first = q.enqueue(video_id).unwrap();
        q.dequeue().unwrap();
        q.fail(first.id, "encode blew up");

        // The lease is gone, so a resubmission creates a fresh job.
        let second = q.enqueue(video_id).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn poll_follows_lifecycle_into_history() {
        let q = queue();
        let handle = q.enqueue(VideoId::new()).unwrap();
        assert_eq!(q.poll(handle.id), Some(JobState::Pending));

        let job = q.dequeue().unwrap();
        q.set_state(job.id, JobState::Encoding);
        assert_eq!(q.poll(handle.id), Some(JobState::Encoding));

        q.complete(job.id);
        assert_eq!(q.poll(handle.id), Some(JobState::Completed));
    }

    #[test]
    fn poll_unknown_job_is_none() {
        let q = queue();
        assert!(q.poll(ConversionJobId::new()).is_none());
    }

    #[test]
    fn failed_job_keeps_error_and_renditions_in_history() {
        let q = queue();
        let handle = q.enqueue(VideoId::new()).unwrap();
        let job = q.dequeue().unwrap();
        q.record_rendition(job.id, 0);
        q.record_rendition(job.id, 1);
        q.fail(job.id, "rendition 2 failed");

        let stored = q.get(handle.id).unwrap();
        assert_eq!(stored.state, JobState::Failed);
        assert_eq!(stored.completed_renditions, vec![0, 1]);
        assert_eq!(stored.error.as_deref(), Some("rendition 2 failed"));
    }

    #[test]
    fn queue_broadcasts_lifecycle_events() {
        let events = Arc::new(EventBus::default());
        let q = MemoryJobQueue::new(events.clone());
        let mut rx = events.subscribe();

        q.enqueue(VideoId::new()).unwrap();
        let job = q.dequeue().unwrap();
        q.complete(job.id);

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| format!("{:?}", e.payload))
            .collect();
        assert_eq!(kinds.len(), 3, "queued, started, completed: {kinds:?}");
        assert!(kinds[0].contains("JobQueued"));
        assert!(kinds[2].contains("JobCompleted"));
    }

    #[test]
    fn history_is_bounded() {
        let q = queue();
        for _ in 0..(MAX_HISTORY_SIZE + 10) {
            let handle = q.enqueue(VideoId::new()).unwrap();
            q.dequeue().unwrap();
            q.complete(handle.id);
        }
        assert_eq!(q.history(MAX_HISTORY_SIZE * 2).len(), MAX_HISTORY_SIZE);
    }
}
