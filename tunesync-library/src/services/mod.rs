//! Library business services

pub mod cover_resolver;
pub mod playlist_service;

pub use cover_resolver::CoverResolver;
pub use playlist_service::PlaylistService;
