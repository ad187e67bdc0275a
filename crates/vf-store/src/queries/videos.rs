//! Video catalog operations.

use chrono::Utc;
use rusqlite::Connection;
use vf_core::{Error, NewVideoAsset, Result, VideoAsset, VideoId};

use crate::models::video_from_row;

pub(crate) const COLS: &str =
    "id, title, description, genre, input_path, hls_master_playlist, thumbnail, created_at";

/// Insert a new video row.
pub fn create_video(conn: &Connection, asset: &NewVideoAsset) -> Result<VideoAsset> {
    let id = VideoId::new();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO videos (id, title, description, genre, input_path, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            id.to_string(),
            asset.title,
            asset.description,
            asset.genre,
            asset.input_path,
            &now
        ],
    )
    .map_err(|e| Error::store(e.to_string()))?;

    Ok(VideoAsset {
        id,
        title: asset.title.clone(),
        description: asset.description.clone(),
        genre: asset.genre.clone(),
        input_path: asset.input_path.clone(),
        hls_master_playlist: None,
        thumbnail: None,
        created_at: now,
    })
}

/// Get a video by ID.
pub fn get_video(conn: &Connection, id: VideoId) -> Result<Option<VideoAsset>> {
    let q = format!("SELECT {COLS} FROM videos WHERE id = ?1");
    let result = conn.query_row(&q, [id.to_string()], video_from_row);
    match result {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::store(e.to_string())),
    }
}

/// Whether a video row exists.
pub fn video_exists(conn: &Connection, id: VideoId) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM videos WHERE id = ?1",
        [id.to_string()],
        |row| row.get(0),
    )
    .map_err(|e| Error::store(e.to_string()))
}

/// Set the master playlist locator. Returns `false` if no row matched.
pub fn update_hls_playlist(conn: &Connection, id: VideoId, locator: &str) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE videos SET hls_master_playlist = ?1 WHERE id = ?2",
            rusqlite::params![locator, id.to_string()],
        )
        .map_err(|e| Error::store(e.to_string()))?;
    Ok(n > 0)
}

/// Set the thumbnail locator. Returns `false` if no row matched.
pub fn update_thumbnail(conn: &Connection, id: VideoId, locator: &str) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE videos SET thumbnail = ?1 WHERE id = ?2",
            rusqlite::params![locator, id.to_string()],
        )
        .map_err(|e| Error::store(e.to_string()))?;
    Ok(n > 0)
}

/// Delete a video row, returning the deleted row if it existed.
///
/// The row is read before deletion so callers still have the input path for
/// artifact reclamation.
pub fn delete_video(conn: &Connection, id: VideoId) -> Result<Option<VideoAsset>> {
    let Some(video) = get_video(conn, id)? else {
        return Ok(None);
    };

    conn.execute("DELETE FROM videos WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::store(e.to_string()))?;

    Ok(Some(video))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};

    fn sample() -> NewVideoAsset {
        NewVideoAsset {
            title: "Sintel".into(),
            description: String::new(),
            genre: "fantasy".into(),
            input_path: "/media/originals/sintel.mp4".into(),
        }
    }

    #[test]
    fn create_sets_defaults() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let video = create_video(&conn, &sample()).unwrap();
        assert!(video.hls_master_playlist.is_none());
        assert!(video.thumbnail.is_none());
        assert!(!video.created_at.is_empty());
    }

    #[test]
    fn stored_row_roundtrips() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let created = create_video(&conn, &sample()).unwrap();
        let fetched = get_video(&conn, created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn locator_updates_are_independent() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let video = create_video(&conn, &sample()).unwrap();

        assert!(update_hls_playlist(&conn, video.id, "videos/hls/x/master.m3u8").unwrap());
        let fetched = get_video(&conn, video.id).unwrap().unwrap();
        assert!(fetched.hls_master_playlist.is_some());
        assert!(fetched.thumbnail.is_none());

        assert!(update_thumbnail(&conn, video.id, "thumbnails/x_thumb.jpg").unwrap());
        let fetched = get_video(&conn, video.id).unwrap().unwrap();
        assert!(fetched.thumbnail.is_some());
    }

    #[test]
    fn update_missing_row_returns_false() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        assert!(!update_hls_playlist(&conn, VideoId::new(), "x").unwrap());
    }

    #[test]
    fn delete_returns_row_once() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let video = create_video(&conn, &sample()).unwrap();
        let deleted = delete_video(&conn, video.id).unwrap();
        assert_eq!(deleted.map(|v| v.id), Some(video.id));
        assert!(delete_video(&conn, video.id).unwrap().is_none());
    }
}
