//! Lifecycle hooks tying the asset catalog to the conversion pipeline.
//!
//! The component that creates or deletes an asset row calls these hooks
//! right after the store mutation. Each hook publishes the corresponding
//! event on the bus and performs its side effect synchronously -- enqueueing
//! a conversion on creation, reclaiming on-disk artifacts on deletion.

use std::io::ErrorKind;
use std::path::Path;

use vf_core::events::EventPayload;
use vf_core::{Result, VideoId};

use crate::context::EngineContext;
use crate::pipeline::MediaLayout;
use crate::queue::JobHandle;

/// Called after a new asset row is created: publish the event and queue its
/// conversion.
pub fn on_asset_created(ctx: &EngineContext, video_id: VideoId) -> Result<JobHandle> {
    ctx.events.broadcast(EventPayload::AssetCreated { video_id });

    let handle = ctx.queue.enqueue(video_id)?;
    tracing::info!(
        video_id = %video_id,
        job_id = %handle.id,
        "Queued conversion for new asset"
    );
    Ok(handle)
}

/// Called after an asset row is deleted: publish the event and remove
/// everything the video left on disk.
///
/// Takes the input path explicitly because the row is already gone.
pub fn on_asset_deleted(ctx: &EngineContext, video_id: VideoId, input_path: &Path) {
    ctx.events.broadcast(EventPayload::AssetDeleted {
        video_id,
        input_path: input_path.to_path_buf(),
    });

    reclaim_artifacts(&ctx.layout, video_id, input_path);
}

/// Remove the original input file, the per-video HLS directory, and the
/// thumbnail.
///
/// Each target is removed independently; a missing file or directory counts
/// as already clean.
pub fn reclaim_artifacts(layout: &MediaLayout, video_id: VideoId, input_path: &Path) {
    remove_file_if_present(input_path);
    remove_dir_if_present(&layout.hls_dir(video_id));
    remove_file_if_present(&layout.thumbnail_path(video_id));
}

fn remove_file_if_present(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::info!(path = %path.display(), "Removed file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove file"),
    }
}

fn remove_dir_if_present(path: &Path) {
    match std::fs::remove_dir_all(path) {
        Ok(()) => tracing::info!(path = %path.display(), "Removed directory"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove directory"),
    }
}
