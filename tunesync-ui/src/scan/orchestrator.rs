//! Scan orchestrator
//!
//! Submits the server's unscanned files in bounded batches, strictly one
//! request at a time, and keeps [`ScanProgress`] current. A cancelled scan
//! does not abort the outstanding request; its result is discarded when it
//! arrives. Failed batches are not retried: the scan stops at the failed
//! batch and `start` resumes from there.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tunesync_common::api::ScanRequest;
use tunesync_common::config::DEFAULT_BATCH_SIZE;
use tunesync_common::events::{EventBus, LibraryEvent};

use super::progress::{ScanPhase, ScanProgress};
use super::LibraryRefresh;
use crate::error::{Result, UiError};
use crate::transport::Transport;

pub struct ScanOrchestrator {
    transport: Arc<dyn Transport>,
    library: Arc<dyn LibraryRefresh>,
    event_bus: EventBus,
    batch_size: usize,
    progress: RwLock<ScanProgress>,
    cancel_token: Mutex<CancellationToken>,
}

impl ScanOrchestrator {
    pub fn new(
        transport: Arc<dyn Transport>,
        library: Arc<dyn LibraryRefresh>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            transport,
            library,
            event_bus,
            batch_size: DEFAULT_BATCH_SIZE,
            progress: RwLock::new(ScanProgress::default()),
            cancel_token: Mutex::new(CancellationToken::new()),
        }
    }

    /// Files per scan request, clamped to `1..=DEFAULT_BATCH_SIZE`
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, DEFAULT_BATCH_SIZE);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub async fn snapshot(&self) -> ScanProgress {
        self.progress.read().await.clone()
    }

    pub async fn is_scanning(&self) -> bool {
        self.progress.read().await.scanning
    }

    /// Listing, scanning, or waiting on a request sent before a cancel
    pub async fn is_busy(&self) -> bool {
        self.progress.read().await.is_busy()
    }

    /// List the scan state from the server, starting a new session
    pub async fn refresh(&self) -> Result<ScanProgress> {
        {
            let mut progress = self.progress.write().await;
            if progress.is_busy() {
                return Err(UiError::AlreadyScanning);
            }
            progress.phase = ScanPhase::Listing;
        }

        let state = match self.transport.scan_state().await {
            Ok(state) => state,
            Err(e) => {
                let mut progress = self.progress.write().await;
                progress.fail(e.reason());
                warn!(reason = %e.reason(), "Failed to load scan state");
                return Err(e.into());
            }
        };

        let mut progress = self.progress.write().await;
        progress.load(state);

        info!(
            session_id = %progress.session_id,
            scanned = progress.scanned(),
            total = progress.total(),
            "Scan state loaded"
        );
        self.event_bus.emit_lossy(LibraryEvent::ScanStateLoaded {
            session_id: progress.session_id,
            scanned: progress.scanned(),
            total: progress.total(),
            timestamp: Utc::now(),
        });

        Ok(progress.clone())
    }

    /// Scan all pending files from the cursor on
    ///
    /// Returns the final progress once the scan completes or is cancelled.
    /// A failed batch ends the call with the transport error; progress is
    /// left `Failed` at the failed batch.
    pub async fn start(&self) -> Result<ScanProgress> {
        let cancel_token = {
            let mut progress = self.progress.write().await;
            if progress.is_busy() {
                return Err(UiError::AlreadyScanning);
            }
            if progress.is_finished() {
                return Err(UiError::NothingToScan);
            }
            progress.to_scan = false;
            progress.scanning = true;
            progress.last_error = None;
            progress.phase = ScanPhase::Scanning;

            info!(
                session_id = %progress.session_id,
                from = progress.cursor,
                remaining = progress.remaining(),
                batch_size = self.batch_size,
                "Starting scan"
            );

            let token = CancellationToken::new();
            *self.cancel_token.lock().await = token.clone();
            token
        };

        self.run_batches(&cancel_token).await
    }

    async fn run_batches(&self, cancel_token: &CancellationToken) -> Result<ScanProgress> {
        loop {
            let batch = {
                let mut progress = self.progress.write().await;
                if cancel_token.is_cancelled() {
                    return Ok(progress.clone());
                }
                match progress.next_batch(self.batch_size) {
                    Some(batch) => {
                        progress.submit();
                        batch
                    }
                    None => {
                        progress.complete();
                        break;
                    }
                }
            };

            let batch_number = batch.start / self.batch_size + 1;
            debug!(
                batch = batch_number,
                files = batch.files.len(),
                finalize = batch.finalize,
                "Submitting scan batch"
            );

            let outcome = self
                .transport
                .scan_batch(&ScanRequest::new(&batch.files, batch.finalize))
                .await;

            let mut progress = self.progress.write().await;
            progress.settle();

            // The server may have scanned this batch, but after cancellation
            // the result is not applied
            if cancel_token.is_cancelled() {
                info!(
                    session_id = %progress.session_id,
                    batch = batch_number,
                    "Discarding result of batch submitted before cancellation"
                );
                return Ok(progress.clone());
            }

            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    progress.fail(e.reason());
                    warn!(
                        session_id = %progress.session_id,
                        batch = batch_number,
                        reason = %e.reason(),
                        "Scan batch failed"
                    );
                    self.event_bus.emit_lossy(LibraryEvent::ScanFailed {
                        session_id: progress.session_id,
                        scanned: progress.scanned(),
                        reason: e.reason(),
                        timestamp: Utc::now(),
                    });
                    return Err(e.into());
                }
            };

            progress.record_batch(&batch, result);
            let finished = progress.is_finished();
            if finished {
                progress.complete();
            }

            self.event_bus.emit_lossy(LibraryEvent::ScanBatchCompleted {
                session_id: progress.session_id,
                batch: batch_number,
                files_in_batch: batch.files.len(),
                scanned: progress.scanned(),
                total: progress.total(),
                update_available: progress.update_available,
                timestamp: Utc::now(),
            });

            let update_available = progress.update_available;
            drop(progress);

            // Refresh on the first batch with results or at the end, never on
            // other intermediate batches
            if update_available && (finished || self.library.is_empty().await) {
                self.refresh_library().await;
            }

            if finished {
                break;
            }
        }

        let progress = self.progress.read().await;
        info!(
            session_id = %progress.session_id,
            scanned = progress.scanned(),
            "Scan completed"
        );
        self.event_bus.emit_lossy(LibraryEvent::ScanCompleted {
            session_id: progress.session_id,
            scanned: progress.scanned(),
            timestamp: Utc::now(),
        });
        Ok(progress.clone())
    }

    async fn refresh_library(&self) {
        match self.library.refresh().await {
            Ok(()) => {
                self.progress.write().await.update_available = false;
            }
            Err(e) => {
                // update_available stays set, the next trigger retries
                warn!(error = %e, "Library refresh after scan batch failed");
            }
        }
    }

    /// Stop scanning after the outstanding batch
    ///
    /// Returns false if no scan was running. The orchestrator stays busy
    /// until the outstanding request is answered.
    pub async fn cancel(&self) -> bool {
        let mut progress = self.progress.write().await;
        if !progress.scanning {
            return false;
        }
        progress.cancel();
        // Fired under the progress lock, so the batch loop never sees a
        // cancelled token with progress still marked as scanning
        self.cancel_token.lock().await.cancel();

        info!(
            session_id = %progress.session_id,
            scanned = progress.scanned(),
            "Scan cancelled"
        );
        self.event_bus.emit_lossy(LibraryEvent::ScanCancelled {
            session_id: progress.session_id,
            scanned: progress.scanned(),
            timestamp: Utc::now(),
        });
        true
    }

    /// Forget the listed scan state and return to `Idle`
    pub async fn reset(&self) -> Result<()> {
        let mut progress = self.progress.write().await;
        if progress.is_busy() {
            return Err(UiError::AlreadyScanning);
        }
        progress.reset();
        debug!("Scan state reset");
        Ok(())
    }

    /// The library reloaded on its own: nothing is pending any more
    pub async fn clear_update_available(&self) {
        self.progress.write().await.update_available = false;
    }
}
