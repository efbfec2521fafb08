//! tunesync-ui: library synchronization client
//!
//! Talks to the library server through a [`Transport`], runs incremental
//! scans with the [`ScanOrchestrator`] and keeps a [`LibraryView`] of the
//! collection current as scan batches land.

pub mod error;
pub mod library_view;
pub mod scan;
pub mod session;
pub mod transport;

pub use error::{Result, TransportError, UiError};
pub use library_view::LibraryView;
pub use scan::{LibraryRefresh, ScanOrchestrator, ScanPhase, ScanProgress};
pub use session::LibrarySession;
pub use transport::{HttpTransport, Transport};
