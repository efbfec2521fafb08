//! Event types and the in-process event bus
//!
//! The scan orchestrator and the library view publish `LibraryEvent`s so that
//! presentation code can follow progress without touching their state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Library synchronization events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LibraryEvent {
    /// Scan state fetched from the server
    ScanStateLoaded {
        session_id: Uuid,
        scanned: usize,
        total: usize,
        timestamp: DateTime<Utc>,
    },

    /// One batch acknowledged by the server
    ScanBatchCompleted {
        session_id: Uuid,
        batch: usize,
        files_in_batch: usize,
        scanned: usize,
        total: usize,
        update_available: bool,
        timestamp: DateTime<Utc>,
    },

    /// All pending files were submitted
    ScanCompleted {
        session_id: Uuid,
        scanned: usize,
        timestamp: DateTime<Utc>,
    },

    /// Scan cancelled by the user
    ScanCancelled {
        session_id: Uuid,
        scanned: usize,
        timestamp: DateTime<Utc>,
    },

    /// A batch request failed; the scan stopped at `scanned`
    ScanFailed {
        session_id: Uuid,
        scanned: usize,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Library snapshot re-fetched
    LibraryReloaded {
        tracks: usize,
        albums: usize,
        playlists: usize,
        timestamp: DateTime<Utc>,
    },
}

impl LibraryEvent {
    /// Event type name, as used in the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            LibraryEvent::ScanStateLoaded { .. } => "ScanStateLoaded",
            LibraryEvent::ScanBatchCompleted { .. } => "ScanBatchCompleted",
            LibraryEvent::ScanCompleted { .. } => "ScanCompleted",
            LibraryEvent::ScanCancelled { .. } => "ScanCancelled",
            LibraryEvent::ScanFailed { .. } => "ScanFailed",
            LibraryEvent::LibraryReloaded { .. } => "LibraryReloaded",
        }
    }
}

/// Broadcast bus for `LibraryEvent`s
///
/// Cloning shares the underlying channel. Subscribers only see events emitted
/// after they subscribed; slow subscribers lose the oldest events once
/// `capacity` is exceeded.
///
/// # Examples
///
/// ```
/// use tunesync_common::events::EventBus;
///
/// let event_bus = EventBus::new(100);
/// let _rx = event_bus.subscribe();
/// assert_eq!(event_bus.subscriber_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<LibraryEvent>,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: LibraryEvent,
    ) -> Result<usize, broadcast::error::SendError<LibraryEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: LibraryEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_emitted_event() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();

        let session_id = Uuid::new_v4();
        bus.emit(LibraryEvent::ScanCompleted {
            session_id,
            scanned: 25,
            timestamp: Utc::now(),
        })
        .unwrap();

        match rx.recv().await.unwrap() {
            LibraryEvent::ScanCompleted { session_id: id, scanned, .. } => {
                assert_eq!(id, session_id);
                assert_eq!(scanned, 25);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(10);
        let event = LibraryEvent::LibraryReloaded {
            tracks: 0,
            albums: 0,
            playlists: 0,
            timestamp: Utc::now(),
        };
        assert!(bus.emit(event.clone()).is_err());
        bus.emit_lossy(event);
        assert_eq!(bus.capacity(), 10);
    }

    #[test]
    fn test_event_type_matches_serde_tag() {
        let event = LibraryEvent::ScanCancelled {
            session_id: Uuid::new_v4(),
            scanned: 10,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
    }
}
