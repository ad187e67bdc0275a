//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory asset catalog, a
//! tempdir media root, an [`EngineContext`], and a [`StubEncoder`] so
//! pipeline behavior can be exercised deterministically without ffmpeg.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use vf_av::Encoder;
use vf_core::config::Config;
use vf_core::events::EventBus;
use vf_core::{NewVideoAsset, RenditionSpec, VideoAsset};
use vf_store::{pool, SqliteVideoStore};

use vodforge::context::EngineContext;
use vodforge::pipeline::MediaLayout;
use vodforge::queue::MemoryJobQueue;
use vodforge::worker::WorkerPool;

/// How the stub encoder behaves.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)] // each test binary uses a subset of behaviors
pub enum StubBehavior {
    /// Write placeholder outputs for every invocation.
    Succeed,
    /// Fail when encoding the given rendition index.
    FailRendition(u32),
    /// Fail every invocation as if the ffmpeg binary were absent.
    ToolMissing,
    /// Encode renditions fine but fail the thumbnail grab.
    FailThumbnail,
}

/// Encoder test double: writes placeholder artifacts instead of invoking
/// ffmpeg, with failure modes selected by [`StubBehavior`].
pub struct StubEncoder {
    behavior: StubBehavior,
}

#[async_trait]
impl Encoder for StubEncoder {
    async fn encode_rendition(
        &self,
        _input: &Path,
        output_dir: &Path,
        spec: &RenditionSpec,
    ) -> vf_core::Result<()> {
        match self.behavior {
            StubBehavior::ToolMissing => Err(vf_core::Error::encode(
                "ffmpeg",
                "ffmpeg not found; is it installed and in PATH?",
            )),
            StubBehavior::FailRendition(index) if index == spec.index => {
                Err(vf_core::Error::encode(
                    "ffmpeg",
                    format!("exited with status 1 encoding variant {}", spec.index),
                ))
            }
            _ => {
                std::fs::write(output_dir.join(spec.variant_playlist_name()), "#EXTM3U\n")?;
                let first_segment = spec.segment_pattern().replace("%03d", "000");
                std::fs::write(output_dir.join(first_segment), b"ts")?;
                Ok(())
            }
        }
    }

    async fn extract_thumbnail(&self, _input: &Path, output: &Path) -> vf_core::Result<()> {
        match self.behavior {
            StubBehavior::ToolMissing => Err(vf_core::Error::encode(
                "ffmpeg",
                "ffmpeg not found; is it installed and in PATH?",
            )),
            StubBehavior::FailThumbnail => Err(vf_core::Error::encode(
                "ffmpeg",
                "exited with status 1: source shorter than thumbnail offset",
            )),
            _ => {
                std::fs::write(output, b"jpeg")?;
                Ok(())
            }
        }
    }
}

/// Test harness wrapping a fully-constructed [`EngineContext`] backed by an
/// in-memory catalog and a tempdir media root.
pub struct TestHarness {
    pub ctx: EngineContext,
    pub media_root: tempfile::TempDir,
}

#[allow(dead_code)] // each test binary uses a subset of helpers
impl TestHarness {
    /// Create a harness whose encoder succeeds.
    pub fn new() -> Self {
        Self::with_encoder(StubBehavior::Succeed)
    }

    /// Create a harness with the given encoder behavior.
    pub fn with_encoder(behavior: StubBehavior) -> Self {
        let media_root = tempfile::tempdir().expect("failed to create media root");
        let db = pool::init_memory_pool().expect("failed to create in-memory pool");

        let store = Arc::new(SqliteVideoStore::new(db));
        let events = Arc::new(EventBus::default());
        let queue = Arc::new(MemoryJobQueue::new(events.clone()));
        let layout = MediaLayout::new(media_root.path());
        let encoder = Arc::new(StubEncoder { behavior });

        let ctx = EngineContext {
            store,
            queue,
            encoder,
            events,
            layout,
            config: Arc::new(Config::default()),
        };

        Self { ctx, media_root }
    }

    /// Register an asset whose input file exists under the media root.
    pub fn create_asset(&self, title: &str) -> VideoAsset {
        let originals = self.media_root.path().join("videos").join("originals");
        std::fs::create_dir_all(&originals).expect("failed to create originals dir");
        let input = originals.join(format!("{title}.mp4"));
        std::fs::write(&input, b"master file contents").expect("failed to write input file");

        self.ctx
            .store
            .create(&NewVideoAsset {
                title: title.into(),
                description: String::new(),
                genre: String::new(),
                input_path: input.to_string_lossy().into_owned(),
            })
            .expect("failed to create asset")
    }

    /// Process queued jobs on the current task until the queue is empty.
    pub async fn drain(&self) {
        WorkerPool::new(&self.ctx).drain().await;
    }
}
