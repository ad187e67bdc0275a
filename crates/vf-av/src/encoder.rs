//! Rendition encoding and thumbnail extraction.
//!
//! [`Encoder`] is the seam the conversion pipeline drives; [`FfmpegEncoder`]
//! is the production implementation, issuing one ffmpeg invocation per
//! rendition and one per thumbnail. The encoder is stateless: it writes
//! files into the output directory and never touches job or asset state.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use vf_core::config::EncodingConfig;
use vf_core::RenditionSpec;

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Encoding parameters shared by every invocation.
#[derive(Debug, Clone)]
pub struct EncoderSettings {
    /// HLS segment duration in seconds.
    pub segment_seconds: u32,
    /// x264 preset.
    pub preset: String,
    /// Offset into the source (seconds) for the thumbnail frame.
    pub thumbnail_offset_secs: u32,
    /// Watchdog timeout per invocation.
    pub timeout: Duration,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self::from(&EncodingConfig::default())
    }
}

impl From<&EncodingConfig> for EncoderSettings {
    fn from(config: &EncodingConfig) -> Self {
        Self {
            segment_seconds: config.segment_seconds,
            preset: config.preset.clone(),
            thumbnail_offset_secs: config.thumbnail_offset_secs,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// The encoding seam driven by the conversion pipeline.
///
/// Both operations fail with [`vf_core::Error::Encode`] when the external
/// tool is missing, exits non-zero, or times out. A source shorter than the
/// thumbnail offset is an accepted failure mode of `extract_thumbnail` --
/// surfaced as an error, never silently defaulted.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encode one rendition of `input` into `output_dir`, producing the
    /// variant playlist and its segments.
    async fn encode_rendition(
        &self,
        input: &Path,
        output_dir: &Path,
        spec: &RenditionSpec,
    ) -> vf_core::Result<()>;

    /// Grab a single frame from `input` and write it to `output`.
    async fn extract_thumbnail(&self, input: &Path, output: &Path) -> vf_core::Result<()>;
}

/// Production encoder backed by the ffmpeg CLI.
pub struct FfmpegEncoder {
    tools: Arc<ToolRegistry>,
    settings: EncoderSettings,
}

impl FfmpegEncoder {
    /// Create an encoder using the given tool registry and settings.
    pub fn new(tools: Arc<ToolRegistry>, settings: EncoderSettings) -> Self {
        Self { tools, settings }
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn encode_rendition(
        &self,
        input: &Path,
        output_dir: &Path,
        spec: &RenditionSpec,
    ) -> vf_core::Result<()> {
        let ffmpeg = self.tools.require("ffmpeg")?;

        tracing::info!(
            rendition = spec.index,
            resolution = %spec.resolution(),
            video_bitrate_kbps = spec.video_bitrate_kbps,
            "Encoding rendition"
        );

        let mut cmd = ToolCommand::new(ffmpeg.path.clone());
        cmd.timeout(self.settings.timeout);
        cmd.args(rendition_args(input, output_dir, spec, &self.settings));
        cmd.execute().await?;

        Ok(())
    }

    async fn extract_thumbnail(&self, input: &Path, output: &Path) -> vf_core::Result<()> {
        let ffmpeg = self.tools.require("ffmpeg")?;

        tracing::info!(
            offset_secs = self.settings.thumbnail_offset_secs,
            output = %output.display(),
            "Extracting thumbnail"
        );

        let mut cmd = ToolCommand::new(ffmpeg.path.clone());
        cmd.timeout(self.settings.timeout);
        cmd.args(thumbnail_args(input, output, &self.settings));
        cmd.execute().await?;

        Ok(())
    }
}

/// Build the ffmpeg argument list for one HLS rendition.
///
/// Scale filter and bitrates come from the rendition; the segment pattern and
/// variant playlist name are keyed by the variant index so repeated runs
/// overwrite the same files. `-hls_list_size 0` keeps every segment in the
/// variant playlist (no rollover).
fn rendition_args(
    input: &Path,
    output_dir: &Path,
    spec: &RenditionSpec,
    settings: &EncoderSettings,
) -> Vec<String> {
    let segment_path = output_dir.join(spec.segment_pattern());
    let playlist_path = output_dir.join(spec.variant_playlist_name());

    vec![
        "-y".into(),
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-vf".into(),
        format!("scale={}:{}", spec.width, spec.height),
        "-b:v".into(),
        format!("{}k", spec.video_bitrate_kbps),
        "-c:v".into(),
        "h264".into(),
        "-preset".into(),
        settings.preset.clone(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        format!("{}k", spec.audio_bitrate_kbps),
        "-f".into(),
        "hls".into(),
        "-hls_time".into(),
        settings.segment_seconds.to_string(),
        "-hls_list_size".into(),
        "0".into(),
        "-hls_segment_filename".into(),
        segment_path.to_string_lossy().into_owned(),
        playlist_path.to_string_lossy().into_owned(),
    ]
}

/// Build the ffmpeg argument list for a single-frame thumbnail grab.
fn thumbnail_args(input: &Path, output: &Path, settings: &EncoderSettings) -> Vec<String> {
    vec![
        "-y".into(),
        "-ss".into(),
        settings.thumbnail_offset_secs.to_string(),
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-vframes".into(),
        "1".into(),
        "-q:v".into(),
        "2".into(),
        output.to_string_lossy().into_owned(),
    ]
}
