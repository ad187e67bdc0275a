//! Filesystem layout for conversion outputs under the media root.
//!
//! All output paths are derived from the video id, so a re-run for the same
//! video lands in the same place and overwrites. Store locators are
//! media-root-relative; absolute paths never leak into the catalog.

use std::path::{Path, PathBuf};

use vf_core::ladder::MASTER_PLAYLIST_NAME;
use vf_core::VideoId;

/// Path derivation for everything a conversion writes.
#[derive(Debug, Clone)]
pub struct MediaLayout {
    media_root: PathBuf,
}

impl MediaLayout {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Directory holding every HLS artifact for a video.
    pub fn hls_dir(&self, id: VideoId) -> PathBuf {
        self.media_root
            .join("videos")
            .join("hls")
            .join(id.to_string())
    }

    /// Absolute path of the master playlist.
    pub fn master_playlist_path(&self, id: VideoId) -> PathBuf {
        self.hls_dir(id).join(MASTER_PLAYLIST_NAME)
    }

    /// Directory holding extracted thumbnails.
    pub fn thumbnail_dir(&self) -> PathBuf {
        self.media_root.join("thumbnails")
    }

    /// Absolute path of a video's thumbnail.
    pub fn thumbnail_path(&self, id: VideoId) -> PathBuf {
        self.thumbnail_dir().join(format!("{id}_thumb.jpg"))
    }

    /// Media-root-relative locator stored in the catalog for the playlist.
    pub fn playlist_locator(&self, id: VideoId) -> String {
        format!("videos/hls/{id}/{MASTER_PLAYLIST_NAME}")
    }

    /// Media-root-relative locator stored in the catalog for the thumbnail.
    pub fn thumbnail_locator(&self, id: VideoId) -> String {
        format!("thumbnails/{id}_thumb.jpg")
    }
}
