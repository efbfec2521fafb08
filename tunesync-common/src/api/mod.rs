//! API module for the shared HTTP contract
//!
//! Request/response payloads exchanged between the library server and the
//! client. No HTTP framework types live here; each side wraps these with its
//! own client or router.

pub mod types;

pub use types::{ScanBatchResult, ScanRequest, ScanState};
