//! Playlist database operations
//!
//! Track order lives in the `track_ids` column as `|3|1|2|`.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tunesync_common::models::Playlist;
use tunesync_common::{Result, TrackId};

fn playlist_from_row(row: &SqliteRow) -> Playlist {
    let track_ids: String = row.get("track_ids");
    Playlist {
        id: row.get("id"),
        name: row.get("name"),
        track_ids: Playlist::decode_track_ids(&track_ids),
        user_id: row.get("user_id"),
    }
}

/// Load one playlist owned by `user_id`
pub async fn load_playlist(
    pool: &SqlitePool,
    playlist_id: i64,
    user_id: &str,
) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, name, track_ids
        FROM playlists
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(playlist_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(playlist_from_row))
}

/// Load all playlists of a user, oldest first
pub async fn load_playlists(pool: &SqlitePool, user_id: &str) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, name, track_ids
        FROM playlists
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(playlist_from_row).collect())
}

/// Insert a playlist, returning it with the id the database assigned
pub async fn insert_playlist(pool: &SqlitePool, mut playlist: Playlist) -> Result<Playlist> {
    let result = sqlx::query(
        r#"
        INSERT INTO playlists (user_id, name, track_ids, created_at, updated_at)
        VALUES (?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(&playlist.user_id)
    .bind(&playlist.name)
    .bind(Playlist::encode_track_ids(&playlist.track_ids))
    .execute(pool)
    .await?;

    playlist.id = result.last_insert_rowid();
    Ok(playlist)
}

/// Save name and track order. Returns false if no row matched.
pub async fn update_playlist(pool: &SqlitePool, playlist: &Playlist) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE playlists
        SET name = ?, track_ids = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&playlist.name)
    .bind(Playlist::encode_track_ids(&playlist.track_ids))
    .bind(playlist.id)
    .bind(&playlist.user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a playlist. Returns false if no row matched.
pub async fn delete_playlist(pool: &SqlitePool, playlist_id: i64, user_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ? AND user_id = ?")
        .bind(playlist_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Playlists of every user that reference `track_id` at least once
pub async fn load_playlists_containing_track(
    pool: &SqlitePool,
    track_id: TrackId,
) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, name, track_ids
        FROM playlists
        WHERE track_ids LIKE ?
        ORDER BY id
        "#,
    )
    .bind(format!("%|{}|%", track_id))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(playlist_from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunesync_common::db::init_memory_database;

    fn playlist(user_id: &str, name: &str, track_ids: Vec<TrackId>) -> Playlist {
        Playlist {
            id: 0,
            name: name.to_string(),
            track_ids,
            user_id: user_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_load_keeps_order_and_duplicates() {
        let pool = init_memory_database().await.unwrap();

        let saved = insert_playlist(&pool, playlist("alice", "Mix", vec![3, 1, 2, 1]))
            .await
            .unwrap();
        assert!(saved.id > 0);

        let loaded = load_playlist(&pool, saved.id, "alice").await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.track_ids, vec![3, 1, 2, 1]);
    }

    #[tokio::test]
    async fn test_other_user_cannot_load_or_change() {
        let pool = init_memory_database().await.unwrap();
        let saved = insert_playlist(&pool, playlist("alice", "Mix", vec![1]))
            .await
            .unwrap();

        assert!(load_playlist(&pool, saved.id, "bob").await.unwrap().is_none());
        assert!(!delete_playlist(&pool, saved.id, "bob").await.unwrap());

        let mut stolen = saved.clone();
        stolen.user_id = "bob".to_string();
        stolen.name = "Mine now".to_string();
        assert!(!update_playlist(&pool, &stolen).await.unwrap());

        let loaded = load_playlist(&pool, saved.id, "alice").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Mix");
    }

    #[tokio::test]
    async fn test_containing_track_matches_whole_ids_only() {
        let pool = init_memory_database().await.unwrap();
        insert_playlist(&pool, playlist("alice", "A", vec![1, 12])).await.unwrap();
        insert_playlist(&pool, playlist("bob", "B", vec![2, 1])).await.unwrap();
        insert_playlist(&pool, playlist("bob", "C", vec![11, 21])).await.unwrap();

        let lists = load_playlists_containing_track(&pool, 1).await.unwrap();
        let names: Vec<_> = lists.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_empty_track_list_round_trips() {
        let pool = init_memory_database().await.unwrap();
        let saved = insert_playlist(&pool, playlist("alice", "Empty", vec![]))
            .await
            .unwrap();

        let all = load_playlists(&pool, "alice").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, saved.id);
        assert!(all[0].track_ids.is_empty());
    }
}
