//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! sub-configs for media paths, workers, external tools, and encoding. Every
//! section defaults sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub media: MediaConfig,
    pub workers: WorkerConfig,
    pub tools: ToolsConfig,
    pub encoding: EncodingConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit (async, embedded, etc.).
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.workers.count == 0 {
            warnings.push("workers.count is 0; no conversions will run".into());
        }

        if self.encoding.segment_seconds == 0 {
            warnings.push("encoding.segment_seconds is 0; ffmpeg will reject it".into());
        }

        if self.encoding.timeout_secs == 0 {
            warnings.push("encoding.timeout_secs is 0; every encode will time out".into());
        }

        if self.media.media_root.is_relative() {
            warnings.push(format!(
                "media.media_root '{}' is relative; output paths depend on the working directory",
                self.media.media_root.display()
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Media storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Root directory under which all conversion outputs are written.
    pub media_root: PathBuf,
    /// SQLite database file holding the asset catalog.
    pub db_path: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("/data/media"),
            db_path: PathBuf::from("/data/vodforge.db"),
        }
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of concurrent conversion workers.
    pub count: usize,
    /// Seconds a worker sleeps when the queue is empty.
    pub poll_interval_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            count: 2,
            poll_interval_secs: 2,
        }
    }
}

/// External tool locations; `None` means "search PATH".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}

/// Encoding parameters applied to every rendition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// HLS segment duration in seconds.
    pub segment_seconds: u32,
    /// x264 preset passed to ffmpeg.
    pub preset: String,
    /// Offset into the source (seconds) at which the thumbnail frame is
    /// grabbed.
    pub thumbnail_offset_secs: u32,
    /// Watchdog timeout per encoder invocation, in seconds.
    pub timeout_secs: u64,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            segment_seconds: 5,
            preset: "fast".into(),
            thumbnail_offset_secs: 5,
            timeout_secs: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_valid() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.workers.count, 2);
        assert_eq!(config.encoding.segment_seconds, 5);
        assert_eq!(config.encoding.preset, "fast");
        assert_eq!(config.media.media_root, PathBuf::from("/data/media"));
    }

    #[test]
    fn partial_override() {
        let config = Config::from_json(
            r#"{"workers": {"count": 8}, "encoding": {"preset": "slow"}}"#,
        )
        .unwrap();
        assert_eq!(config.workers.count, 8);
        assert_eq!(config.workers.poll_interval_secs, 2);
        assert_eq!(config.encoding.preset, "slow");
        assert_eq!(config.encoding.segment_seconds, 5);
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(Config::from_json("not json").is_err());
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let config = Config::load_or_default(Some(Path::new("/nonexistent/vodforge.json")));
        assert_eq!(config.workers.count, 2);
    }

    #[test]
    fn default_config_has_no_warnings() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn zero_workers_warns() {
        let mut config = Config::default();
        config.workers.count = 0;
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("workers.count")));
    }

    #[test]
    fn relative_media_root_warns() {
        let mut config = Config::default();
        config.media.media_root = PathBuf::from("media");
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("relative")));
    }
}
