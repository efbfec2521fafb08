//! Track database operations

use std::collections::BTreeSet;

use super::placeholders;
use sqlx::{Row, SqlitePool};
use tunesync_common::models::Track;
use tunesync_common::{Result, TrackId};

/// Ids bound per `IN (...)` query, well below SQLite's bound-variable limit
const MAX_IDS_PER_QUERY: usize = 500;

/// Load the tracks of `user_id` whose ids are in `ids`
///
/// Duplicate ids are collapsed and ids that match nothing are skipped, so the
/// result may be shorter than `ids`. Long id lists are queried in chunks.
pub async fn load_tracks_by_ids(
    pool: &SqlitePool,
    ids: &[TrackId],
    user_id: &str,
) -> Result<Vec<Track>> {
    let unique: Vec<TrackId> = ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut tracks = Vec::with_capacity(unique.len());
    for chunk in unique.chunks(MAX_IDS_PER_QUERY) {
        let sql = format!(
            r#"
            SELECT id, title, number, disk, album_id, artist_id, file_id
            FROM tracks
            WHERE user_id = ? AND id IN {}
            "#,
            placeholders(chunk.len())
        );

        let mut query = sqlx::query(&sql).bind(user_id);
        for id in chunk {
            query = query.bind(*id);
        }
        let rows = query.fetch_all(pool).await?;

        tracks.extend(rows.iter().map(|row| Track {
            id: row.get("id"),
            title: row.get("title"),
            number: row.get("number"),
            disk: row.get("disk"),
            album_id: row.get("album_id"),
            artist_id: row.get("artist_id"),
            file_id: row.get("file_id"),
        }));
    }

    Ok(tracks)
}
