//! vf-core: shared ids, errors, events, the rendition ladder, and configuration.
//!
//! This crate is the foundational dependency for the other vf-* crates,
//! providing type-safe identifiers, the unified error type, the fixed encode
//! ladder with master-playlist rendering, the asset repository trait, and a
//! broadcast event bus.

pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod ladder;
pub mod store;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use ladder::{ladder, render_master_playlist, RenditionSpec};
pub use store::{NewVideoAsset, VideoAsset, VideoStore};
