//! Album cover database operations

use super::placeholders;
use sqlx::{Row, SqlitePool};
use tunesync_common::models::{Album, ImageCandidate};
use tunesync_common::{AlbumId, FileId, Result};

/// An album lacking a cover, paired with one folder containing its tracks
///
/// Albums spread over several folders appear once per folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverlessAlbum {
    pub album_id: AlbumId,
    pub user_id: String,
    pub folder_id: i64,
}

/// Coverless albums and the folders of their tracks, optionally for one user
pub async fn load_albums_without_cover(
    pool: &SqlitePool,
    user_id: Option<&str>,
) -> Result<Vec<CoverlessAlbum>> {
    let mut sql = String::from(
        r#"
        SELECT DISTINCT a.id AS album_id, a.user_id AS user_id, f.parent AS folder_id
        FROM albums a
        JOIN tracks t ON t.album_id = a.id
        JOIN files f ON f.id = t.file_id
        WHERE a.cover_file_id IS NULL AND f.parent IS NOT NULL
        "#,
    );
    if user_id.is_some() {
        sql.push_str(" AND a.user_id = ?");
    }
    sql.push_str(" ORDER BY a.id, f.parent");

    let mut query = sqlx::query(&sql);
    if let Some(user_id) = user_id {
        query = query.bind(user_id);
    }
    let rows = query.fetch_all(pool).await?;

    Ok(rows
        .iter()
        .map(|row| CoverlessAlbum {
            album_id: row.get("album_id"),
            user_id: row.get("user_id"),
            folder_id: row.get("folder_id"),
        })
        .collect())
}

/// Image files directly inside a folder, in file id order
pub async fn load_images_in_folder(
    pool: &SqlitePool,
    folder_id: i64,
) -> Result<Vec<ImageCandidate>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name
        FROM files
        WHERE parent = ? AND mimetype LIKE 'image%'
        ORDER BY id
        "#,
    )
    .bind(folder_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| ImageCandidate::new(row.get("id"), row.get::<String, _>("name")))
        .collect())
}

/// Set an album cover unless one is already set
pub async fn set_cover_if_missing(
    pool: &SqlitePool,
    cover_file_id: FileId,
    album_id: AlbumId,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE albums
        SET cover_file_id = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ? AND cover_file_id IS NULL
        "#,
    )
    .bind(cover_file_id)
    .bind(album_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Give every coverless album with tracks in `folder_id` the image `cover_file_id`
pub async fn update_folder_cover(
    pool: &SqlitePool,
    cover_file_id: FileId,
    folder_id: i64,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE albums
        SET cover_file_id = ?, updated_at = CURRENT_TIMESTAMP
        WHERE cover_file_id IS NULL AND id IN (
            SELECT DISTINCT t.album_id
            FROM tracks t
            JOIN files f ON f.id = t.file_id
            WHERE f.parent = ? AND t.album_id IS NOT NULL
        )
        "#,
    )
    .bind(cover_file_id)
    .bind(folder_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Clear covers that point at removed image files
///
/// Returns the affected albums as they were before clearing.
pub async fn remove_covers(
    pool: &SqlitePool,
    cover_file_ids: &[FileId],
    user_ids: Option<&[String]>,
) -> Result<Vec<Album>> {
    if cover_file_ids.is_empty() {
        return Ok(Vec::new());
    }
    if matches!(user_ids, Some(users) if users.is_empty()) {
        return Ok(Vec::new());
    }

    let mut sql = format!(
        "SELECT id, user_id, name, year, cover_file_id FROM albums WHERE cover_file_id IN {}",
        placeholders(cover_file_ids.len())
    );
    if let Some(users) = user_ids {
        sql.push_str(&format!(" AND user_id IN {}", placeholders(users.len())));
    }
    sql.push_str(" ORDER BY id");

    let mut query = sqlx::query(&sql);
    for id in cover_file_ids {
        query = query.bind(*id);
    }
    if let Some(users) = user_ids {
        for user in users {
            query = query.bind(user.as_str());
        }
    }
    let rows = query.fetch_all(pool).await?;

    let albums: Vec<Album> = rows
        .iter()
        .map(|row| Album {
            id: row.get("id"),
            name: row.get("name"),
            year: row.get("year"),
            cover_file_id: row.get("cover_file_id"),
            tracks: Vec::new(),
            user_id: row.get("user_id"),
        })
        .collect();

    if albums.is_empty() {
        return Ok(albums);
    }

    let update_sql = format!(
        "UPDATE albums SET cover_file_id = NULL, updated_at = CURRENT_TIMESTAMP WHERE id IN {}",
        placeholders(albums.len())
    );
    let mut update = sqlx::query(&update_sql);
    for album in &albums {
        update = update.bind(album.id);
    }
    update.execute(pool).await?;

    Ok(albums)
}
