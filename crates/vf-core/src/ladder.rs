//! The fixed rendition ladder and master playlist rendering.
//!
//! Every video is converted to the same ordered set of resolution/bitrate
//! variants, lowest to highest quality. The ordering is significant: the
//! master playlist lists variants low-to-high bandwidth, and the variant
//! index keys every output filename.

use serde::{Deserialize, Serialize};

/// One resolution/bitrate variant of the transcoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenditionSpec {
    /// Stable variant index (0..N-1), used for output filenames and
    /// manifest ordering.
    pub index: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Target video bitrate in kb/s.
    pub video_bitrate_kbps: u32,
    /// Target audio bitrate in kb/s.
    pub audio_bitrate_kbps: u32,
}

impl RenditionSpec {
    /// The resolution string (`<width>x<height>`) used in ffmpeg arguments
    /// and the master playlist.
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// The manifest bandwidth value in bits per second (kb/s × 1000).
    pub fn bandwidth(&self) -> u64 {
        u64::from(self.video_bitrate_kbps) * 1000
    }

    /// Filename of this variant's playlist inside the output directory.
    pub fn variant_playlist_name(&self) -> String {
        format!("variant_{}.m3u8", self.index)
    }

    /// ffmpeg segment filename pattern for this variant (zero-padded
    /// three-digit sequence number).
    pub fn segment_pattern(&self) -> String {
        format!("segment_{}_%03d.ts", self.index)
    }
}

const LADDER: [RenditionSpec; 4] = [
    RenditionSpec {
        index: 0,
        width: 426,
        height: 240,
        video_bitrate_kbps: 500,
        audio_bitrate_kbps: 128,
    },
    RenditionSpec {
        index: 1,
        width: 640,
        height: 360,
        video_bitrate_kbps: 1000,
        audio_bitrate_kbps: 128,
    },
    RenditionSpec {
        index: 2,
        width: 1280,
        height: 720,
        video_bitrate_kbps: 2500,
        audio_bitrate_kbps: 128,
    },
    RenditionSpec {
        index: 3,
        width: 1920,
        height: 1080,
        video_bitrate_kbps: 5000,
        audio_bitrate_kbps: 128,
    },
];

/// The fixed encode ladder, ordered lowest to highest quality.
///
/// Stable across calls; the variant index of each entry equals its position.
pub fn ladder() -> &'static [RenditionSpec] {
    &LADDER
}

/// Filename of the master playlist inside a video's output directory.
pub const MASTER_PLAYLIST_NAME: &str = "master.m3u8";

/// Render the master playlist text for a ladder.
///
/// Pure and byte-stable: identical ladders produce identical output. Each
/// entry contributes one `#EXT-X-STREAM-INF` line (bandwidth in bits per
/// second, resolution string) followed by the variant playlist filename,
/// in ladder order.
pub fn render_master_playlist(ladder: &[RenditionSpec]) -> String {
    let mut out = String::from("#EXTM3U\n");
    for spec in ladder {
        out.push_str(&format!(
            "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}\n",
            spec.bandwidth(),
            spec.resolution()
        ));
        out.push_str(&spec.variant_playlist_name());
        out.push('\n');
    }
    out
}
