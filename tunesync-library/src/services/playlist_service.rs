//! Playlist editing service
//!
//! Every edit is read-modify-write: load the playlist, apply the positional
//! edit from [`tunesync_common::tracklist`], write the whole list back. There
//! is no version check, so concurrent edits of one playlist are last writer
//! wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};
use tunesync_common::models::{truncate_chars, Playlist, Track, PLAYLIST_NAME_MAX_CHARS};
use tunesync_common::tracklist::{self, DanglingPolicy};
use tunesync_common::{Result, TrackId};

use crate::db::{PlaylistStore, TrackStore};

pub struct PlaylistService {
    playlists: Arc<dyn PlaylistStore>,
    tracks: Arc<dyn TrackStore>,
    dangling_policy: DanglingPolicy,
}

impl PlaylistService {
    pub fn new(playlists: Arc<dyn PlaylistStore>, tracks: Arc<dyn TrackStore>) -> Self {
        Self {
            playlists,
            tracks,
            dangling_policy: DanglingPolicy::default(),
        }
    }

    /// Choose how `get_playlist_tracks` treats ids with no library track
    pub fn with_dangling_policy(mut self, policy: DanglingPolicy) -> Self {
        self.dangling_policy = policy;
        self
    }

    pub async fn find(&self, playlist_id: i64, user_id: &str) -> Result<Playlist> {
        self.playlists.find(playlist_id, user_id).await
    }

    pub async fn find_all(&self, user_id: &str) -> Result<Vec<Playlist>> {
        self.playlists.find_all(user_id).await
    }

    /// Create an empty playlist
    pub async fn create(&self, name: &str, user_id: &str) -> Result<Playlist> {
        let playlist = Playlist {
            id: 0,
            name: truncate_chars(name, PLAYLIST_NAME_MAX_CHARS),
            track_ids: Vec::new(),
            user_id: user_id.to_string(),
        };
        let playlist = self.playlists.insert(playlist).await?;
        info!(playlist_id = playlist.id, user_id, "Created playlist");
        Ok(playlist)
    }

    pub async fn rename(&self, name: &str, playlist_id: i64, user_id: &str) -> Result<Playlist> {
        let mut playlist = self.playlists.find(playlist_id, user_id).await?;
        playlist.name = truncate_chars(name, PLAYLIST_NAME_MAX_CHARS);
        self.playlists.update(&playlist).await?;
        Ok(playlist)
    }

    pub async fn delete(&self, playlist_id: i64, user_id: &str) -> Result<()> {
        self.playlists.delete(playlist_id, user_id).await?;
        info!(playlist_id, user_id, "Deleted playlist");
        Ok(())
    }

    /// Append tracks at the end of the playlist
    ///
    /// Ids are not checked against the library; unknown ids are dropped later
    /// by `get_playlist_tracks`.
    pub async fn add_tracks(
        &self,
        track_ids: &[TrackId],
        playlist_id: i64,
        user_id: &str,
    ) -> Result<Playlist> {
        let mut playlist = self.playlists.find(playlist_id, user_id).await?;
        playlist.track_ids = tracklist::add_tracks(&playlist.track_ids, track_ids);
        self.playlists.update(&playlist).await?;
        debug!(playlist_id, added = track_ids.len(), "Added tracks to playlist");
        Ok(playlist)
    }

    /// Remove the entries at the given zero-based positions
    pub async fn remove_tracks(
        &self,
        positions: &[usize],
        playlist_id: i64,
        user_id: &str,
    ) -> Result<Playlist> {
        let mut playlist = self.playlists.find(playlist_id, user_id).await?;
        playlist.track_ids = tracklist::remove_tracks(&playlist.track_ids, positions);
        self.playlists.update(&playlist).await?;
        debug!(playlist_id, remaining = playlist.track_ids.len(), "Removed tracks from playlist");
        Ok(playlist)
    }

    /// Move one entry from position `from` to position `to`
    ///
    /// Fails with `IndexOutOfRange` before anything is written if either
    /// position is outside the list.
    pub async fn move_track(
        &self,
        from: usize,
        to: usize,
        playlist_id: i64,
        user_id: &str,
    ) -> Result<Playlist> {
        let mut playlist = self.playlists.find(playlist_id, user_id).await?;
        playlist.track_ids = tracklist::move_track(&playlist.track_ids, from, to)?;
        self.playlists.update(&playlist).await?;
        debug!(playlist_id, from, to, "Moved playlist entry");
        Ok(playlist)
    }

    /// Drop every occurrence of `track_ids` from all playlists of all users
    ///
    /// Used when tracks disappear from the library. Returns the number of
    /// playlists that changed.
    pub async fn remove_tracks_from_all_lists(&self, track_ids: &[TrackId]) -> Result<usize> {
        let mut affected: BTreeMap<i64, Playlist> = BTreeMap::new();
        for &track_id in track_ids {
            for playlist in self.playlists.find_lists_containing_track(track_id).await? {
                affected.entry(playlist.id).or_insert(playlist);
            }
        }

        for playlist in affected.values_mut() {
            for &track_id in track_ids {
                playlist.track_ids = tracklist::remove_track_id(&playlist.track_ids, track_id);
            }
            self.playlists.update(playlist).await?;
        }

        if !affected.is_empty() {
            info!(playlists = affected.len(), "Removed deleted tracks from playlists");
        }
        Ok(affected.len())
    }

    /// Tracks of a playlist in playlist order
    ///
    /// Each track's number is replaced by its 1-based position in the result.
    pub async fn get_playlist_tracks(&self, playlist_id: i64, user_id: &str) -> Result<Vec<Track>> {
        let playlist = self.playlists.find(playlist_id, user_id).await?;
        let tracks = self.tracks.find_by_ids(&playlist.track_ids, user_id).await?;
        let lookup = tracklist::index_by_id(tracks);
        let projected = tracklist::project(&playlist.track_ids, &lookup, self.dangling_policy)?;
        Ok(projected)
    }
}
