//! Incremental library scanning

pub mod orchestrator;
pub mod progress;

use async_trait::async_trait;

use crate::error::Result;

pub use orchestrator::ScanOrchestrator;
pub use progress::{Batch, ScanPhase, ScanProgress};

/// Hook the orchestrator uses to refresh the in-memory library after batches
/// that changed it
#[async_trait]
pub trait LibraryRefresh: Send + Sync {
    /// No tracks loaded yet
    async fn is_empty(&self) -> bool;

    /// Re-fetch the library snapshot
    async fn refresh(&self) -> Result<()>;
}
