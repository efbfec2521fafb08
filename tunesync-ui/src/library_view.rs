//! In-memory library snapshot
//!
//! Holds the last fetched collection, playlists and folder tree and derives
//! what the presentation layer shows from them: counts, count texts and
//! playlists as ordered track lists.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use tunesync_common::events::{EventBus, LibraryEvent};
use tunesync_common::models::{Artist, Folder, Playlist, Track};
use tunesync_common::tracklist::{self, DanglingPolicy};
use tunesync_common::TrackId;

use crate::error::{Result, UiError};
use crate::scan::LibraryRefresh;
use crate::transport::Transport;

/// `1 track`, `12 tracks`, `0 tracks`
pub fn count_text(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[derive(Debug, Clone, Default)]
struct LibrarySnapshot {
    artists: Vec<Artist>,
    tracks: HashMap<TrackId, Track>,
    album_count: usize,
    playlists: Vec<Playlist>,
    /// `None` until loaded; dropped on every reload
    folders: Option<Vec<Folder>>,
}

impl LibrarySnapshot {
    fn from_collection(artists: Vec<Artist>, playlists: Vec<Playlist>) -> Self {
        let album_count = artists.iter().map(|artist| artist.albums.len()).sum();
        let tracks = tracklist::index_by_id(
            artists
                .iter()
                .flat_map(|artist| &artist.albums)
                .flat_map(|album| &album.tracks)
                .cloned(),
        );
        Self {
            artists,
            tracks,
            album_count,
            playlists,
            folders: None,
        }
    }
}

pub struct LibraryView {
    transport: Arc<dyn Transport>,
    event_bus: EventBus,
    snapshot: RwLock<LibrarySnapshot>,
}

impl LibraryView {
    pub fn new(transport: Arc<dyn Transport>, event_bus: EventBus) -> Self {
        Self {
            transport,
            event_bus,
            snapshot: RwLock::new(LibrarySnapshot::default()),
        }
    }

    /// Re-fetch the collection and the playlists
    ///
    /// The folder tree is invalidated and fetched again on next use. On
    /// failure the previous snapshot is kept.
    pub async fn reload(&self) -> Result<()> {
        let artists = self.transport.collection().await?;
        let playlists = self.transport.playlists().await?;

        let snapshot = LibrarySnapshot::from_collection(artists, playlists);
        let (tracks, albums, playlists) = (
            snapshot.tracks.len(),
            snapshot.album_count,
            snapshot.playlists.len(),
        );
        *self.snapshot.write().await = snapshot;

        info!(tracks, albums, playlists, "Library reloaded");
        self.event_bus.emit_lossy(LibraryEvent::LibraryReloaded {
            tracks,
            albums,
            playlists,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Folder tree, fetched on first use after a reload
    pub async fn load_folders(&self) -> Result<Vec<Folder>> {
        if let Some(folders) = &self.snapshot.read().await.folders {
            return Ok(folders.clone());
        }

        let folders = self.transport.folders().await?;
        debug!(folders = folders.len(), "Folders loaded");
        self.snapshot.write().await.folders = Some(folders.clone());
        Ok(folders)
    }

    pub async fn artists(&self) -> Vec<Artist> {
        self.snapshot.read().await.artists.clone()
    }

    pub async fn playlists(&self) -> Vec<Playlist> {
        self.snapshot.read().await.playlists.clone()
    }

    pub async fn track(&self, track_id: TrackId) -> Option<Track> {
        self.snapshot.read().await.tracks.get(&track_id).cloned()
    }

    pub async fn track_count(&self) -> usize {
        self.snapshot.read().await.tracks.len()
    }

    pub async fn album_count(&self) -> usize {
        self.snapshot.read().await.album_count
    }

    pub async fn track_count_text(&self) -> String {
        count_text(self.track_count().await, "track", "tracks")
    }

    pub async fn album_count_text(&self) -> String {
        count_text(self.album_count().await, "album", "albums")
    }

    /// Empty while the folder tree is not loaded
    pub async fn folder_count_text(&self) -> String {
        match &self.snapshot.read().await.folders {
            Some(folders) => count_text(folders.len(), "folder", "folders"),
            None => String::new(),
        }
    }

    /// Tracks of a playlist in playlist order, numbered by position
    ///
    /// Entries whose track is not in the loaded library are left out.
    pub async fn playlist_tracks(&self, playlist_id: i64) -> Result<Vec<Track>> {
        let snapshot = self.snapshot.read().await;
        let playlist = snapshot
            .playlists
            .iter()
            .find(|playlist| playlist.id == playlist_id)
            .ok_or_else(|| {
                UiError::Common(tunesync_common::Error::NotFound(format!(
                    "Playlist {}",
                    playlist_id
                )))
            })?;

        let tracks = tracklist::project(&playlist.track_ids, &snapshot.tracks, DanglingPolicy::Skip)
            .map_err(tunesync_common::Error::from)?;
        Ok(tracks)
    }

    pub async fn playlist_track_count_text(&self, playlist_id: i64) -> Result<String> {
        let tracks = self.playlist_tracks(playlist_id).await?;
        Ok(count_text(tracks.len(), "track", "tracks"))
    }
}

#[async_trait]
impl LibraryRefresh for LibraryView {
    async fn is_empty(&self) -> bool {
        self.snapshot.read().await.tracks.is_empty()
    }

    async fn refresh(&self) -> Result<()> {
        self.reload().await
    }
}
