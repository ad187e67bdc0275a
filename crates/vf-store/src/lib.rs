//! vf-store: SQLite-backed asset catalog.
//!
//! Implements the [`vf_core::VideoStore`] repository trait over an r2d2
//! connection pool. The pipeline consumes the trait; this crate owns the
//! schema, migrations, and row mapping.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

use vf_core::{Error, NewVideoAsset, Result, VideoAsset, VideoId, VideoStore};

use crate::pool::DbPool;

/// [`VideoStore`] implementation backed by SQLite.
#[derive(Clone)]
pub struct SqliteVideoStore {
    pool: DbPool,
}

impl SqliteVideoStore {
    /// Wrap an initialized connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (used by tests and maintenance tooling).
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl VideoStore for SqliteVideoStore {
    fn create(&self, asset: &NewVideoAsset) -> Result<VideoAsset> {
        let conn = pool::get_conn(&self.pool)?;
        queries::videos::create_video(&conn, asset)
    }

    fn get(&self, id: VideoId) -> Result<VideoAsset> {
        let conn = pool::get_conn(&self.pool)?;
        queries::videos::get_video(&conn, id)?.ok_or_else(|| Error::not_found("video", id))
    }

    fn exists(&self, id: VideoId) -> Result<bool> {
        let conn = pool::get_conn(&self.pool)?;
        queries::videos::video_exists(&conn, id)
    }

    fn update_playlist(&self, id: VideoId, locator: &str) -> Result<()> {
        let conn = pool::get_conn(&self.pool)?;
        if !queries::videos::update_hls_playlist(&conn, id, locator)? {
            return Err(Error::not_found("video", id));
        }
        Ok(())
    }

    fn update_thumbnail(&self, id: VideoId, locator: &str) -> Result<()> {
        let conn = pool::get_conn(&self.pool)?;
        if !queries::videos::update_thumbnail(&conn, id, locator)? {
            return Err(Error::not_found("video", id));
        }
        Ok(())
    }

    fn delete(&self, id: VideoId) -> Result<VideoAsset> {
        let conn = pool::get_conn(&self.pool)?;
        queries::videos::delete_video(&conn, id)?.ok_or_else(|| Error::not_found("video", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> SqliteVideoStore {
        SqliteVideoStore::new(pool::init_memory_pool().unwrap())
    }

    fn sample_asset() -> NewVideoAsset {
        NewVideoAsset {
            title: "Big Buck Bunny".into(),
            description: "A large rabbit".into(),
            genre: "animation".into(),
            input_path: "/media/originals/bbb.mp4".into(),
        }
    }

    #[test]
    fn create_and_get_roundtrip() {
        let store = memory_store();
        let created = store.create(&sample_asset()).unwrap();

        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Big Buck Bunny");
        assert!(fetched.hls_master_playlist.is_none());
        assert!(fetched.thumbnail.is_none());
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = memory_store();
        let err = store.get(VideoId::new()).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn exists_reflects_rows() {
        let store = memory_store();
        let created = store.create(&sample_asset()).unwrap();
        assert!(store.exists(created.id).unwrap());
        assert!(!store.exists(VideoId::new()).unwrap());
    }

    #[test]
    fn playlist_update_sets_locator() {
        let store = memory_store();
        let created = store.create(&sample_asset()).unwrap();

        let locator = format!("videos/hls/{}/master.m3u8", created.id);
        store.update_playlist(created.id, &locator).unwrap();

        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched.hls_master_playlist.as_deref(), Some(locator.as_str()));
    }

    #[test]
    fn thumbnail_update_sets_locator() {
        let store = memory_store();
        let created = store.create(&sample_asset()).unwrap();

        let locator = format!("thumbnails/{}_thumb.jpg", created.id);
        store.update_thumbnail(created.id, &locator).unwrap();

        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched.thumbnail.as_deref(), Some(locator.as_str()));
    }

    #[test]
    fn updates_on_missing_row_are_not_found() {
        let store = memory_store();
        let err = store.update_playlist(VideoId::new(), "x").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        let err = store.update_thumbnail(VideoId::new(), "x").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn delete_returns_the_row_and_removes_it() {
        let store = memory_store();
        let created = store.create(&sample_asset()).unwrap();

        let deleted = store.delete(created.id).unwrap();
        assert_eq!(deleted.id, created.id);
        assert_eq!(deleted.input_path, "/media/originals/bbb.mp4");
        assert!(!store.exists(created.id).unwrap());

        let err = store.delete(created.id).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
