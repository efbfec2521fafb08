//! Scan progress state
//!
//! Process-local bookkeeping for one scan session. Nothing here is persisted:
//! the server records per batch which files it has scanned, so a lost
//! `ScanProgress` is rebuilt by listing the scan state again.

use serde::Serialize;
use tunesync_common::api::{ScanBatchResult, ScanState};
use tunesync_common::FileId;
use uuid::Uuid;

/// Scan session phase
///
/// `Idle → Listing → Scanning ⇄ BatchInFlight → Completed`, with `Cancelled`
/// reachable from `Scanning`/`BatchInFlight` and `Failed` from a failed batch
/// or listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanPhase {
    Idle,
    /// Scan state request outstanding
    Listing,
    /// Pending files known, ready to submit the next batch
    Scanning,
    BatchInFlight,
    Completed,
    Cancelled,
    Failed,
}

/// One batch of pending files to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Position of the first file in the pending list
    pub start: usize,
    /// One past the last file
    pub end: usize,
    pub files: Vec<FileId>,
    /// Last batch of the session
    pub finalize: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanProgress {
    pub session_id: Uuid,
    pub phase: ScanPhase,
    /// Files the server had already scanned when the state was listed
    pub previously_scanned: usize,
    /// Files still unscanned at listing time, in submission order
    pub pending: Vec<FileId>,
    /// Index into `pending` of the next file to submit
    pub cursor: usize,
    /// Pending files exist and the scan has not been started
    pub to_scan: bool,
    pub scanning: bool,
    /// A scan request is outstanding. Stays set through a cancel until the
    /// answer arrives and is discarded.
    pub in_flight: bool,
    /// Some batch changed the library since the last refresh
    pub update_available: bool,
    pub last_error: Option<String>,
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            phase: ScanPhase::Idle,
            previously_scanned: 0,
            pending: Vec::new(),
            cursor: 0,
            to_scan: false,
            scanning: false,
            in_flight: false,
            update_available: false,
            last_error: None,
        }
    }
}

impl ScanProgress {
    /// Files scanned so far, including those scanned before this session
    pub fn scanned(&self) -> usize {
        self.previously_scanned + self.cursor
    }

    pub fn total(&self) -> usize {
        self.previously_scanned + self.pending.len()
    }

    /// The server knows of no audio files at all
    pub fn no_music_available(&self) -> bool {
        self.phase != ScanPhase::Idle && self.phase != ScanPhase::Listing && self.total() == 0
    }

    pub fn remaining(&self) -> usize {
        self.pending.len() - self.cursor
    }

    /// A listing, a scan or an unanswered scan request is running
    pub fn is_busy(&self) -> bool {
        self.scanning || self.in_flight || self.phase == ScanPhase::Listing
    }

    /// Adopt a freshly listed scan state, starting a new session
    pub fn load(&mut self, state: ScanState) {
        self.session_id = Uuid::new_v4();
        self.previously_scanned = state.scanned_count;
        self.pending = state.unscanned_files;
        self.cursor = 0;
        self.to_scan = !self.pending.is_empty();
        self.scanning = false;
        self.last_error = None;
        self.phase = if self.to_scan {
            ScanPhase::Scanning
        } else {
            ScanPhase::Completed
        };
    }

    /// The next batch starting at the cursor, or `None` when all were sent
    pub fn next_batch(&self, batch_size: usize) -> Option<Batch> {
        if self.cursor >= self.pending.len() {
            return None;
        }
        let end = (self.cursor + batch_size).min(self.pending.len());
        Some(Batch {
            start: self.cursor,
            end,
            files: self.pending[self.cursor..end].to_vec(),
            finalize: self.cursor + batch_size >= self.pending.len(),
        })
    }

    /// Mark a batch as submitted
    pub fn submit(&mut self) {
        self.in_flight = true;
        self.phase = ScanPhase::BatchInFlight;
    }

    /// The outstanding request was answered, whether or not it is applied
    pub fn settle(&mut self) {
        self.in_flight = false;
    }

    /// Apply an acknowledged batch
    pub fn record_batch(&mut self, batch: &Batch, result: ScanBatchResult) {
        self.in_flight = false;
        self.cursor = batch.end;
        if result.has_updates() {
            self.update_available = true;
        }
        self.phase = ScanPhase::Scanning;
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.pending.len()
    }

    pub fn complete(&mut self) {
        self.scanning = false;
        self.to_scan = false;
        self.phase = ScanPhase::Completed;
    }

    pub fn cancel(&mut self) {
        self.scanning = false;
        self.phase = ScanPhase::Cancelled;
    }

    /// Stop at the current cursor; a later start resubmits the failed batch
    pub fn fail(&mut self, reason: String) {
        self.scanning = false;
        self.phase = ScanPhase::Failed;
        self.last_error = Some(reason);
    }

    /// Forget the listed state and the session
    pub fn reset(&mut self) {
        let update_available = self.update_available;
        *self = Self {
            update_available,
            ..Self::default()
        };
    }
}
