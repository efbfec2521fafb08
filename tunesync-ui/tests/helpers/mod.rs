//! Test Helper Utilities
//!
//! In-memory transport and library doubles for tunesync-ui tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tunesync_common::api::{ScanBatchResult, ScanRequest, ScanState};
use tunesync_common::models::{Album, Artist, Folder, Playlist, Track};
use tunesync_common::{FileId, TrackId};
use tunesync_ui::{LibraryRefresh, Transport, TransportError};

/// Scripted transport
///
/// Batch results are taken from `results` in order; once it is empty every
/// batch reports all of its files as scanned.
#[derive(Default)]
pub struct MockTransport {
    pub scan_state: Mutex<Option<ScanState>>,
    pub results: Mutex<VecDeque<Result<ScanBatchResult, TransportError>>>,
    pub requests: Mutex<Vec<ScanRequest>>,
    pub collection: Mutex<Vec<Artist>>,
    pub playlists: Mutex<Vec<Playlist>>,
    pub folders: Mutex<Vec<Folder>>,
    pub collection_calls: AtomicUsize,
    pub folder_calls: AtomicUsize,
    /// Signalled whenever a batch request arrives
    pub batch_received: Notify,
    /// When set, each batch waits for a permit before answering
    pub gate: Option<Arc<Notify>>,
}

impl MockTransport {
    pub fn with_pending(scanned: usize, pending: usize) -> Self {
        let transport = Self::default();
        transport.set_scan_state(scanned, pending);
        transport
    }

    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn set_scan_state(&self, scanned: usize, pending: usize) {
        *self.scan_state.lock().unwrap() = Some(ScanState {
            scanned_count: scanned,
            unscanned_files: (1..=pending as FileId).collect(),
        });
    }

    pub fn push_result(&self, result: Result<ScanBatchResult, TransportError>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn requests(&self) -> Vec<ScanRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn scan_state(&self) -> Result<ScanState, TransportError> {
        self.scan_state
            .lock()
            .unwrap()
            .clone()
            .ok_or(TransportError::Status(500))
    }

    async fn scan_batch(&self, request: &ScanRequest) -> Result<ScanBatchResult, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.batch_received.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let scripted = self.results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(ScanBatchResult {
                files_scanned: request.file_ids().len(),
                covers_updated: false,
            })
        })
    }

    async fn collection(&self) -> Result<Vec<Artist>, TransportError> {
        self.collection_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.collection.lock().unwrap().clone())
    }

    async fn playlists(&self) -> Result<Vec<Playlist>, TransportError> {
        Ok(self.playlists.lock().unwrap().clone())
    }

    async fn folders(&self) -> Result<Vec<Folder>, TransportError> {
        self.folder_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.folders.lock().unwrap().clone())
    }
}

/// Library double counting refreshes
pub struct MockLibrary {
    pub empty: AtomicBool,
    pub refreshes: AtomicUsize,
}

impl MockLibrary {
    pub fn empty() -> Self {
        Self {
            empty: AtomicBool::new(true),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn loaded() -> Self {
        Self {
            empty: AtomicBool::new(false),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LibraryRefresh for MockLibrary {
    async fn is_empty(&self) -> bool {
        self.empty.load(Ordering::SeqCst)
    }

    async fn refresh(&self) -> tunesync_ui::Result<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        self.empty.store(false, Ordering::SeqCst);
        Ok(())
    }
}

pub fn track(id: TrackId, title: &str, number: i32) -> Track {
    Track {
        id,
        title: title.to_string(),
        number: Some(number),
        disk: None,
        album_id: Some(1),
        artist_id: Some(1),
        file_id: Some(id + 100),
    }
}

/// One artist with one album holding `tracks`
pub fn collection(tracks: Vec<Track>) -> Vec<Artist> {
    vec![Artist {
        id: 1,
        name: Some("Artist".to_string()),
        albums: vec![Album {
            id: 1,
            name: Some("Album".to_string()),
            year: None,
            cover_file_id: None,
            tracks,
            user_id: String::new(),
        }],
    }]
}

pub fn playlist(id: i64, name: &str, track_ids: Vec<TrackId>) -> Playlist {
    Playlist {
        id,
        name: name.to_string(),
        track_ids,
        user_id: String::new(),
    }
}
