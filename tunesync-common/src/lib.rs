//! # TuneSync Common Library
//!
//! Shared code for the TuneSync library server and client including:
//! - Library models (tracks, albums, playlists, folders)
//! - Wire types for the scan/playlist HTTP contract
//! - Event types (LibraryEvent) and the event bus
//! - Configuration loading
//! - Ordered track list editing and playlist projection
//! - SQLite schema initialization

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod tracklist;

pub use error::{Error, Result};
pub use models::{AlbumId, FileId, TrackId};
pub use tracklist::{DanglingPolicy, TrackListError};
