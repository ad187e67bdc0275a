//! The conversion state machine driving one job end-to-end.
//!
//! A job walks Preparing -> Encoding -> ManifestWriting ->
//! ThumbnailExtracting -> Persisting; the first error at any stage aborts
//! the job. The asset record is mutated only in Persisting, so a failed job
//! never leaves a dangling playlist reference -- files already written for
//! completed renditions stay on disk unreferenced and are overwritten by the
//! next attempt.

use std::path::Path;
use std::sync::Arc;

use vf_av::Encoder;
use vf_core::{ladder, render_master_playlist, Error, VideoStore};

use crate::pipeline::layout::MediaLayout;
use crate::queue::{ConversionJob, JobQueue, JobState};

/// Executes conversion jobs against the store, encoder, and queue.
pub struct Orchestrator {
    store: Arc<dyn VideoStore>,
    encoder: Arc<dyn Encoder>,
    queue: Arc<dyn JobQueue>,
    layout: MediaLayout,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn VideoStore>,
        encoder: Arc<dyn Encoder>,
        queue: Arc<dyn JobQueue>,
        layout: MediaLayout,
    ) -> Self {
        Self {
            store,
            encoder,
            queue,
            layout,
        }
    }

    /// Drive one dequeued job to a terminal state.
    ///
    /// Never returns an error: every failure is recorded on the job and
    /// logged with the video id and the stage that failed, so nothing
    /// escapes to the queue layer.
    pub async fn run(&self, job: &ConversionJob) {
        let video_id = job.video_id;
        tracing::info!(job_id = %job.id, video_id = %video_id, "Starting conversion");

        match self.execute(job).await {
            Ok(()) => {
                tracing::info!(job_id = %job.id, video_id = %video_id, "Conversion completed");
                self.queue.complete(job.id);
            }
            Err((stage, e)) => {
                if stage == JobState::Persisting {
                    // Encoding succeeded; the artifacts exist on disk but the
                    // catalog row still points at nothing.
                    tracing::error!(
                        video_id = %video_id,
                        stage = %stage,
                        error = %e,
                        "Store update failed after successful encode; artifacts are unreferenced"
                    );
                } else {
                    tracing::error!(
                        video_id = %video_id,
                        stage = %stage,
                        error = %e,
                        "Conversion failed"
                    );
                }
                self.queue.fail(job.id, &e.to_string());
            }
        }
    }

    /// Walk the pipeline stages, tagging any error with the stage it
    /// occurred in.
    async fn execute(&self, job: &ConversionJob) -> Result<(), (JobState, Error)> {
        let video_id = job.video_id;

        // Preparing: resolve the asset before touching the filesystem, so a
        // job for an unknown id performs zero writes.
        self.queue.set_state(job.id, JobState::Preparing);
        let asset = self
            .store
            .get(video_id)
            .map_err(|e| (JobState::Preparing, e))?;

        let hls_dir = self.layout.hls_dir(video_id);
        // An existing directory from a prior partial attempt is reused.
        std::fs::create_dir_all(&hls_dir).map_err(|e| (JobState::Preparing, e.into()))?;

        // Encoding: strictly sequential in ladder order, stop on first
        // failure.
        self.queue.set_state(job.id, JobState::Encoding);
        let input = Path::new(&asset.input_path);
        for spec in ladder() {
            self.encoder
                .encode_rendition(input, &hls_dir, spec)
                .await
                .map_err(|e| (JobState::Encoding, e))?;
            self.queue.record_rendition(job.id, spec.index);
        }

        // ManifestWriting: overwrite whatever a previous attempt left.
        self.queue.set_state(job.id, JobState::ManifestWriting);
        let manifest = render_master_playlist(ladder());
        std::fs::write(self.layout.master_playlist_path(video_id), manifest)
            .map_err(|e| (JobState::ManifestWriting, e.into()))?;

        // ThumbnailExtracting: fatal on failure, but rendition files written
        // above stay on disk.
        self.queue.set_state(job.id, JobState::ThumbnailExtracting);
        std::fs::create_dir_all(self.layout.thumbnail_dir())
            .map_err(|e| (JobState::ThumbnailExtracting, e.into()))?;
        let thumbnail_path = self.layout.thumbnail_path(video_id);
        self.encoder
            .extract_thumbnail(input, &thumbnail_path)
            .await
            .map_err(|e| (JobState::ThumbnailExtracting, e))?;

        // Persisting: the only stage allowed to mutate the asset record.
        self.queue.set_state(job.id, JobState::Persisting);
        self.store
            .update_playlist(video_id, &self.layout.playlist_locator(video_id))
            .map_err(|e| (JobState::Persisting, e))?;
        self.store
            .update_thumbnail(video_id, &self.layout.thumbnail_locator(video_id))
            .map_err(|e| (JobState::Persisting, e))?;

        Ok(())
    }
}
