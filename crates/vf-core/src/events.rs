//! Application event system.
//!
//! [`EventBus`] wraps a `tokio::sync::broadcast` channel with a bounded
//! ring-buffer of recent events. The component that creates or deletes an
//! asset row publishes the corresponding lifecycle event; the queue publishes
//! job transitions as they happen.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::ids::{ConversionJobId, VideoId};

/// Maximum number of events retained in the ring buffer.
const MAX_RECENT_EVENTS: usize = 100;

// ---------------------------------------------------------------------------
// EventPayload
// ---------------------------------------------------------------------------

/// Payload describing what happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    // -- Asset lifecycle -----------------------------------------------------
    AssetCreated {
        video_id: VideoId,
    },
    /// Carries the input path because the row is already gone when artifact
    /// reclamation runs.
    AssetDeleted {
        video_id: VideoId,
        input_path: PathBuf,
    },

    // -- Job lifecycle -------------------------------------------------------
    JobQueued {
        job_id: ConversionJobId,
        video_id: VideoId,
    },
    JobStarted {
        job_id: ConversionJobId,
        video_id: VideoId,
    },
    JobStage {
        job_id: ConversionJobId,
        video_id: VideoId,
        stage: String,
    },
    JobCompleted {
        job_id: ConversionJobId,
        video_id: VideoId,
    },
    JobFailed {
        job_id: ConversionJobId,
        video_id: VideoId,
        error: String,
    },
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A timestamped event ready for broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub payload: EventPayload,
}

impl Event {
    /// Create a new event with a fresh UUID and the current timestamp.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Broadcast channel with a bounded ring buffer of recent events.
pub struct EventBus {
    tx: broadcast::Sender<Event>,
    recent: RwLock<VecDeque<Event>>,
}

impl EventBus {
    /// Create a new event bus.
    ///
    /// `capacity` controls the broadcast channel buffer size (not the ring
    /// buffer, which is always [`MAX_RECENT_EVENTS`]).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            recent: RwLock::new(VecDeque::with_capacity(MAX_RECENT_EVENTS)),
        }
    }

    /// Subscribe to the broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Broadcast an event to all current subscribers and store it in the
    /// ring buffer.
    pub fn broadcast(&self, payload: EventPayload) {
        let event = Event::new(payload);

        // Store in ring buffer regardless of subscriber count.
        {
            let mut recent = self.recent.write();
            if recent.len() >= MAX_RECENT_EVENTS {
                recent.pop_back();
            }
            recent.push_front(event.clone());
        }

        // Ignore send errors (no subscribers).
        let _ = self.tx.send(event);
    }

    /// Return the `n` most recent events (newest first).
    pub fn recent_events(&self, n: usize) -> Vec<Event> {
        let recent = self.recent.read();
        recent.iter().take(n).cloned().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let video_id = VideoId::new();
        bus.broadcast(EventPayload::AssetCreated { video_id });

        let event = rx.try_recv().unwrap();
        match &event.payload {
            EventPayload::AssetCreated { video_id: received } => {
                assert_eq!(*received, video_id)
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn recent_events_capped() {
        let bus = EventBus::new(256);
        let video_id = VideoId::new();

        for _ in 0..150 {
            bus.broadcast(EventPayload::AssetCreated { video_id });
        }

        let recent = bus.recent_events(200);
        assert_eq!(recent.len(), MAX_RECENT_EVENTS);
    }

    #[test]
    fn recent_events_newest_first() {
        let bus = EventBus::new(16);
        let video_id = VideoId::new();

        for _ in 0..5 {
            bus.broadcast(EventPayload::AssetCreated { video_id });
        }
        bus.broadcast(EventPayload::AssetDeleted {
            video_id,
            input_path: PathBuf::from("/media/originals/a.mp4"),
        });

        let recent = bus.recent_events(3);
        assert_eq!(recent.len(), 3);
        assert!(matches!(
            recent[0].payload,
            EventPayload::AssetDeleted { .. }
        ));
    }

    #[test]
    fn no_subscribers_does_not_panic() {
        let bus = EventBus::new(4);
        bus.broadcast(EventPayload::JobFailed {
            job_id: ConversionJobId::new(),
            video_id: VideoId::new(),
            error: "test".into(),
        });
    }

    #[test]
    fn event_serde_roundtrip() {
        let event = Event::new(EventPayload::JobStage {
            job_id: ConversionJobId::new(),
            video_id: VideoId::new(),
            stage: "encoding".into(),
        });
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, event.id);
    }
}
