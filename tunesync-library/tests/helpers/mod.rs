//! Test Helper Utilities
//!
//! Shared fixtures for tunesync-library integration tests

#![allow(dead_code)]

use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;
use tunesync_common::db::init_memory_database;
use tunesync_common::{AlbumId, FileId, TrackId};
use tunesync_library::SqliteStore;

/// In-memory library database wrapped in a store
pub async fn create_test_store() -> Result<Arc<SqliteStore>> {
    let pool = init_memory_database().await?;
    Ok(Arc::new(SqliteStore::new(pool)))
}

pub async fn seed_file(
    pool: &SqlitePool,
    id: FileId,
    parent: i64,
    name: &str,
    mimetype: &str,
) -> Result<()> {
    sqlx::query("INSERT INTO files (id, parent, name, mimetype, user_id) VALUES (?, ?, ?, ?, 'alice')")
        .bind(id)
        .bind(parent)
        .bind(name)
        .bind(mimetype)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn seed_album(pool: &SqlitePool, id: AlbumId, user_id: &str) -> Result<()> {
    sqlx::query("INSERT INTO albums (id, user_id, name) VALUES (?, ?, ?)")
        .bind(id)
        .bind(user_id)
        .bind(format!("Album {}", id))
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert a track with album track number `number`
pub async fn seed_track(
    pool: &SqlitePool,
    id: TrackId,
    user_id: &str,
    title: &str,
    number: i32,
    album_id: Option<AlbumId>,
    file_id: FileId,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO tracks (id, user_id, title, number, album_id, file_id) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(number)
    .bind(album_id)
    .bind(file_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn album_cover(pool: &SqlitePool, album_id: AlbumId) -> Result<Option<FileId>> {
    let cover = sqlx::query_scalar("SELECT cover_file_id FROM albums WHERE id = ?")
        .bind(album_id)
        .fetch_one(pool)
        .await?;
    Ok(cover)
}
