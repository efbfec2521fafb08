//! Library models shared by the server-side business layer and the client

use serde::{Deserialize, Serialize};

/// Track identifier
pub type TrackId = i64;
/// Album identifier
pub type AlbumId = i64;
/// File identifier (audio file or image in the user's file tree)
pub type FileId = i64;

/// Maximum stored playlist name length (column width of the playlists table)
pub const PLAYLIST_NAME_MAX_CHARS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    /// Track number. Inside a playlist projection this is the 1-based
    /// position on the list instead of the disc track number.
    pub number: Option<i32>,
    #[serde(default)]
    pub disk: Option<i32>,
    #[serde(default)]
    pub album_id: Option<AlbumId>,
    #[serde(default)]
    pub artist_id: Option<i64>,
    #[serde(default)]
    pub file_id: Option<FileId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: AlbumId,
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Image file used as cover art, `None` until one has been resolved
    #[serde(default)]
    pub cover_file_id: Option<FileId>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(skip)]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: i64,
    pub name: Option<String>,
    #[serde(default)]
    pub albums: Vec<Album>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    /// User-ordered track references. Duplicates are allowed and ids are
    /// not checked against the library.
    #[serde(default)]
    pub track_ids: Vec<TrackId>,
    #[serde(skip)]
    pub user_id: String,
}

impl Playlist {
    /// Encode track ids for the `track_ids` text column, e.g. `|3|1|2|`
    ///
    /// The leading and trailing delimiters make `LIKE '%|id|%'` an exact
    /// membership test.
    pub fn encode_track_ids(track_ids: &[TrackId]) -> String {
        if track_ids.is_empty() {
            return String::new();
        }
        let joined = track_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("|");
        format!("|{}|", joined)
    }

    /// Decode the `track_ids` text column, skipping malformed entries
    pub fn decode_track_ids(column: &str) -> Vec<TrackId> {
        column
            .split('|')
            .filter(|part| !part.is_empty())
            .filter_map(|part| part.parse().ok())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub track_ids: Vec<TrackId>,
}

/// Image file found next to an album's tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub file_id: FileId,
    pub name: String,
}

impl ImageCandidate {
    pub fn new(file_id: FileId, name: impl Into<String>) -> Self {
        Self {
            file_id,
            name: name.into(),
        }
    }
}

/// Truncate to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => value[..byte_index].to_string(),
        None => value.to_string(),
    }
}
