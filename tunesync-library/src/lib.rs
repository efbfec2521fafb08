//! tunesync-library: server-side library business layer
//!
//! Playlist editing and album cover resolution. Both services work over the
//! async store traits in [`db`]; [`db::SqliteStore`] implements them on the
//! shared SQLite database.

pub mod db;
pub mod services;

pub use db::{AlbumStore, CoverlessAlbum, PlaylistStore, SqliteStore, TrackStore};
pub use services::{CoverResolver, PlaylistService};
