//! Row mapping for database tables.
//!
//! The [`VideoAsset`] struct itself lives in `vf-core` (it crosses the
//! repository boundary); this module supplies the `rusqlite` row
//! conversion.

use uuid::Uuid;
use vf_core::{VideoAsset, VideoId};

/// Parse a UUID-based ID from a text column.
fn parse_id(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<VideoId> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(VideoId::from(uuid))
}

/// Construct a [`VideoAsset`] from a row selected with `videos::COLS`.
pub fn video_from_row(row: &rusqlite::Row) -> rusqlite::Result<VideoAsset> {
    Ok(VideoAsset {
        id: parse_id(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        genre: row.get(3)?,
        input_path: row.get(4)?,
        hls_master_playlist: row.get(5)?,
        thumbnail: row.get(6)?,
        created_at: row.get(7)?,
    })
}
