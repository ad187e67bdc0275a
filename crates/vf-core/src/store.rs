//! The asset repository boundary consumed by the conversion pipeline.
//!
//! The pipeline never talks to a database directly; it goes through
//! [`VideoStore`], which a storage backend (see `vf-store`) implements. The
//! store owns the asset row; the pipeline only ever mutates the playlist and
//! thumbnail locators, and only after a conversion fully succeeds.

use serde::{Deserialize, Serialize};

use crate::ids::VideoId;
use crate::Result;

/// A persisted video asset.
///
/// `hls_master_playlist` and `thumbnail` are media-root-relative locators;
/// they are `None` until a conversion job for this asset completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub genre: String,
    /// Absolute path of the uploaded master file.
    pub input_path: String,
    /// Media-root-relative locator of the master playlist, set on the first
    /// successful conversion.
    pub hls_master_playlist: Option<String>,
    /// Media-root-relative locator of the extracted thumbnail.
    pub thumbnail: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Fields required to register a new asset.
#[derive(Debug, Clone, Default)]
pub struct NewVideoAsset {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub input_path: String,
}

/// Narrow repository interface over the asset catalog.
///
/// Implementations must be safe to share across worker tasks.
pub trait VideoStore: Send + Sync {
    /// Register a new asset and return the stored row.
    fn create(&self, asset: &NewVideoAsset) -> Result<VideoAsset>;

    /// Fetch an asset by id; [`crate::Error::NotFound`] if absent.
    fn get(&self, id: VideoId) -> Result<VideoAsset>;

    /// Whether an asset row exists for the given id.
    fn exists(&self, id: VideoId) -> Result<bool>;

    /// Set the master playlist locator for an asset.
    fn update_playlist(&self, id: VideoId, locator: &str) -> Result<()>;

    /// Set the thumbnail locator for an asset.
    fn update_thumbnail(&self, id: VideoId, locator: &str) -> Result<()>;

    /// Delete an asset row, returning the deleted row so callers can reclaim
    /// its on-disk artifacts. [`crate::Error::NotFound`] if absent.
    fn delete(&self, id: VideoId) -> Result<VideoAsset>;
}
