//! vf-av: external encoder integration.
//!
//! Wraps the command-line ffmpeg toolchain behind the [`Encoder`] trait:
//! tool discovery ([`ToolRegistry`]), a timeout-guarded process runner
//! ([`ToolCommand`]), and the HLS rendition / thumbnail invocations
//! ([`FfmpegEncoder`]).

pub mod command;
pub mod encoder;
pub mod tools;

pub use command::{ToolCommand, ToolOutput};
pub use encoder::{Encoder, EncoderSettings, FfmpegEncoder};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
