//! Library session
//!
//! Wires one transport, one library view and one scan orchestrator together
//! the way the presentation layer uses them.

use std::sync::Arc;

use tunesync_common::config::TomlConfig;
use tunesync_common::events::EventBus;

use crate::error::Result;
use crate::library_view::LibraryView;
use crate::scan::{ScanOrchestrator, ScanProgress};
use crate::transport::{HttpTransport, Transport};

/// Event bus capacity for one session
const EVENT_CAPACITY: usize = 100;

pub struct LibrarySession {
    library: Arc<LibraryView>,
    scanner: Arc<ScanOrchestrator>,
    event_bus: EventBus,
}

impl LibrarySession {
    pub fn new(transport: Arc<dyn Transport>, event_bus: EventBus, batch_size: usize) -> Self {
        let library = Arc::new(LibraryView::new(transport.clone(), event_bus.clone()));
        let scanner = Arc::new(
            ScanOrchestrator::new(transport, library.clone(), event_bus.clone())
                .with_batch_size(batch_size),
        );
        Self {
            library,
            scanner,
            event_bus,
        }
    }

    /// Session talking HTTP to the configured server
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.server_url)?;
        Ok(Self::new(
            Arc::new(transport),
            EventBus::new(EVENT_CAPACITY),
            config.batch_size,
        ))
    }

    pub fn library(&self) -> &Arc<LibraryView> {
        &self.library
    }

    pub fn scanner(&self) -> &Arc<ScanOrchestrator> {
        &self.scanner
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Reload the library, then re-list the scan state unless a scan is
    /// running (its intermediate results were just loaded)
    pub async fn update(&self) -> Result<Option<ScanProgress>> {
        self.scanner.clear_update_available().await;
        self.library.reload().await?;

        if self.scanner.is_busy().await {
            return Ok(None);
        }
        Ok(Some(self.scanner.refresh().await?))
    }

    /// [`update`](Self::update), falling back to the running scan's progress
    pub async fn current_progress(&self) -> Result<ScanProgress> {
        match self.update().await? {
            Some(progress) => Ok(progress),
            None => Ok(self.scanner.snapshot().await),
        }
    }
}
