//! Library persistence
//!
//! Store traits are the seam the services are written against. The SQLite
//! implementation delegates to the per-table query functions in the
//! submodules.

pub mod albums;
pub mod playlists;
pub mod tracks;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tunesync_common::models::{Album, ImageCandidate, Playlist, Track};
use tunesync_common::{AlbumId, FileId, Result, TrackId};

pub use albums::CoverlessAlbum;

/// Playlist persistence, scoped by owning user
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Load one playlist. `Error::NotFound` if it does not exist or belongs
    /// to another user.
    async fn find(&self, playlist_id: i64, user_id: &str) -> Result<Playlist>;

    async fn find_all(&self, user_id: &str) -> Result<Vec<Playlist>>;

    /// Insert a new playlist and return it with its assigned id
    async fn insert(&self, playlist: Playlist) -> Result<Playlist>;

    /// Persist name and track order
    async fn update(&self, playlist: &Playlist) -> Result<()>;

    async fn delete(&self, playlist_id: i64, user_id: &str) -> Result<()>;

    /// Playlists of any user referencing `track_id`
    async fn find_lists_containing_track(&self, track_id: TrackId) -> Result<Vec<Playlist>>;
}

#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Tracks of `user_id` among `ids`, in no particular order. Unknown ids
    /// are simply absent from the result.
    async fn find_by_ids(&self, ids: &[TrackId], user_id: &str) -> Result<Vec<Track>>;
}

/// Album cover persistence
#[async_trait]
pub trait AlbumStore: Send + Sync {
    /// Albums without a cover, with each folder holding some of their tracks
    async fn albums_without_cover(&self, user_id: Option<&str>) -> Result<Vec<CoverlessAlbum>>;

    /// Image files directly inside `folder_id`
    async fn images_in_folder(&self, folder_id: i64) -> Result<Vec<ImageCandidate>>;

    /// Set the cover unless the album already has one. Returns whether the
    /// album was changed.
    async fn set_cover_if_missing(&self, cover_file_id: FileId, album_id: AlbumId) -> Result<bool>;

    /// Use `cover_file_id` for every coverless album with tracks in `folder_id`
    async fn update_folder_cover(&self, cover_file_id: FileId, folder_id: i64) -> Result<bool>;

    /// Clear covers pointing at any of `cover_file_ids`, returning the albums
    /// that lost their cover
    async fn remove_covers(
        &self,
        cover_file_ids: &[FileId],
        user_ids: Option<&[String]>,
    ) -> Result<Vec<Album>>;
}

/// All library stores on one SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PlaylistStore for SqliteStore {
    async fn find(&self, playlist_id: i64, user_id: &str) -> Result<Playlist> {
        playlists::load_playlist(&self.pool, playlist_id, user_id)
            .await?
            .ok_or_else(|| not_found(playlist_id, user_id))
    }

    async fn find_all(&self, user_id: &str) -> Result<Vec<Playlist>> {
        playlists::load_playlists(&self.pool, user_id).await
    }

    async fn insert(&self, playlist: Playlist) -> Result<Playlist> {
        playlists::insert_playlist(&self.pool, playlist).await
    }

    async fn update(&self, playlist: &Playlist) -> Result<()> {
        if playlists::update_playlist(&self.pool, playlist).await? {
            Ok(())
        } else {
            Err(not_found(playlist.id, &playlist.user_id))
        }
    }

    async fn delete(&self, playlist_id: i64, user_id: &str) -> Result<()> {
        if playlists::delete_playlist(&self.pool, playlist_id, user_id).await? {
            Ok(())
        } else {
            Err(not_found(playlist_id, user_id))
        }
    }

    async fn find_lists_containing_track(&self, track_id: TrackId) -> Result<Vec<Playlist>> {
        playlists::load_playlists_containing_track(&self.pool, track_id).await
    }
}

#[async_trait]
impl TrackStore for SqliteStore {
    async fn find_by_ids(&self, ids: &[TrackId], user_id: &str) -> Result<Vec<Track>> {
        tracks::load_tracks_by_ids(&self.pool, ids, user_id).await
    }
}

#[async_trait]
impl AlbumStore for SqliteStore {
    async fn albums_without_cover(&self, user_id: Option<&str>) -> Result<Vec<CoverlessAlbum>> {
        albums::load_albums_without_cover(&self.pool, user_id).await
    }

    async fn images_in_folder(&self, folder_id: i64) -> Result<Vec<ImageCandidate>> {
        albums::load_images_in_folder(&self.pool, folder_id).await
    }

    async fn set_cover_if_missing(&self, cover_file_id: FileId, album_id: AlbumId) -> Result<bool> {
        albums::set_cover_if_missing(&self.pool, cover_file_id, album_id).await
    }

    async fn update_folder_cover(&self, cover_file_id: FileId, folder_id: i64) -> Result<bool> {
        albums::update_folder_cover(&self.pool, cover_file_id, folder_id).await
    }

    async fn remove_covers(
        &self,
        cover_file_ids: &[FileId],
        user_ids: Option<&[String]>,
    ) -> Result<Vec<Album>> {
        albums::remove_covers(&self.pool, cover_file_ids, user_ids).await
    }
}

fn not_found(playlist_id: i64, user_id: &str) -> tunesync_common::Error {
    tunesync_common::Error::NotFound(format!(
        "Playlist {} not found for user {}",
        playlist_id, user_id
    ))
}

/// `(?, ?, ?)` for an `IN` clause with `count` bound values
pub(crate) fn placeholders(count: usize) -> String {
    format!("({})", vec!["?"; count].join(", "))
}
