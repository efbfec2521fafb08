//! Database initialization tests
//!
//! Verifies that the library database is created on first run and that
//! reopening an existing database keeps its rows.

use sqlx::Row;
use tempfile::TempDir;
use tunesync_common::db::{init_database, init_memory_database};

async fn table_names(pool: &sqlx::SqlitePool) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_creates_database_file_and_tables() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("library.db");

    let pool = init_database(&db_path).await.unwrap();

    assert!(db_path.exists(), "database file should be created");
    assert_eq!(
        table_names(&pool).await,
        vec!["albums", "files", "playlists", "tracks"]
    );
}

#[tokio::test]
async fn test_reopen_keeps_existing_rows() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("library.db");

    {
        let pool = init_database(&db_path).await.unwrap();
        sqlx::query("INSERT INTO playlists (user_id, name, track_ids) VALUES ('alice', 'Mix', '|1|2|')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = init_database(&db_path).await.unwrap();
    let row = sqlx::query("SELECT name, track_ids FROM playlists WHERE user_id = 'alice'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<String, _>("name"), "Mix");
    assert_eq!(row.get::<String, _>("track_ids"), "|1|2|");
}

#[tokio::test]
async fn test_memory_database_has_schema() {
    let pool = init_memory_database().await.unwrap();
    assert_eq!(table_names(&pool).await.len(), 4);
}
