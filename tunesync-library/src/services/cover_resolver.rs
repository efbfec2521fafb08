//! Album cover resolution
//!
//! Picks the most likely cover among the images found next to an album's
//! tracks. Names are matched case-insensitively against a fixed list of
//! prefixes; earlier prefixes win and ties keep their input order.

use std::sync::Arc;

use tracing::{debug, info};
use tunesync_common::models::{Album, ImageCandidate};
use tunesync_common::{AlbumId, FileId, Result};

use crate::db::AlbumStore;

/// Cover name prefixes, best first
pub const COVER_NAME_PREFIXES: [&str; 4] = ["cover", "albumart", "front", "folder"];

/// Rank of a file name, lower is better. `usize::MAX` when no prefix matches.
pub fn cover_rank(name: &str) -> usize {
    let name = name.to_lowercase();
    COVER_NAME_PREFIXES
        .iter()
        .position(|prefix| name.starts_with(prefix))
        .unwrap_or(usize::MAX)
}

/// Best cover among `candidates`
///
/// An image matching no prefix still beats having no cover at all, so any
/// non-empty input yields a choice.
pub fn select_cover(candidates: &[ImageCandidate]) -> Option<&ImageCandidate> {
    let mut ranked: Vec<&ImageCandidate> = candidates.iter().collect();
    ranked.sort_by_key(|candidate| cover_rank(&candidate.name));
    ranked.into_iter().next()
}

/// Resolves and persists album covers
pub struct CoverResolver {
    albums: Arc<dyn AlbumStore>,
}

impl CoverResolver {
    pub fn new(albums: Arc<dyn AlbumStore>) -> Self {
        Self { albums }
    }

    /// Pick a cover for one album from the images in `folder_id`
    ///
    /// Returns true if the album got a cover. An album that already has one
    /// is left alone.
    pub async fn find_album_cover(&self, album_id: AlbumId, folder_id: i64) -> Result<bool> {
        let candidates = self.albums.images_in_folder(folder_id).await?;
        let Some(chosen) = select_cover(&candidates) else {
            return Ok(false);
        };

        let updated = self.albums.set_cover_if_missing(chosen.file_id, album_id).await?;
        if updated {
            debug!(album_id, cover_file_id = chosen.file_id, name = %chosen.name, "Set album cover");
        }
        Ok(updated)
    }

    /// Resolve covers for every coverless album, optionally of one user
    ///
    /// Returns true if any album got a cover.
    pub async fn find_covers(&self, user_id: Option<&str>) -> Result<bool> {
        let albums = self.albums.albums_without_cover(user_id).await?;

        let mut found = 0usize;
        for album in &albums {
            if self.find_album_cover(album.album_id, album.folder_id).await? {
                found += 1;
            }
        }

        if found > 0 {
            info!(albums = found, "Resolved album covers");
        }
        Ok(found > 0)
    }

    /// A new image appeared in `folder_id`: use it for coverless albums there
    pub async fn update_folder_cover(&self, cover_file_id: FileId, folder_id: i64) -> Result<bool> {
        self.albums.update_folder_cover(cover_file_id, folder_id).await
    }

    /// Images were deleted: clear covers that pointed at them
    pub async fn remove_covers(
        &self,
        cover_file_ids: &[FileId],
        user_ids: Option<&[String]>,
    ) -> Result<Vec<Album>> {
        let albums = self.albums.remove_covers(cover_file_ids, user_ids).await?;
        if !albums.is_empty() {
            info!(albums = albums.len(), "Cleared covers of removed images");
        }
        Ok(albums)
    }
}
