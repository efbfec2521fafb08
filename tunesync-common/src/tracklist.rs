//! Ordered track list editing
//!
//! A playlist is a user-ordered sequence of track ids. The operations here are
//! pure: they take the current sequence and return the edited one, leaving
//! persistence to the caller (read, edit, write back).
//!
//! Positions are zero-based. `move_track` uses splice semantics: the element
//! is removed first and `to` is measured against the shortened sequence.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::warn;

use crate::models::{Track, TrackId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackListError {
    /// A move referenced a position outside the sequence
    #[error("Index {index} out of range for track list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A playlist entry has no matching library track
    #[error("Track {0} referenced by playlist is not in the library")]
    DanglingReference(TrackId),
}

/// What `project` does with ids missing from the lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingPolicy {
    /// Log a warning and leave the entry out of the projection
    #[default]
    Skip,
    /// Fail with `TrackListError::DanglingReference`
    Strict,
}

/// Record that can appear in a playlist projection
pub trait Numbered {
    fn track_id(&self) -> TrackId;

    /// Overwrite the displayed track number
    fn set_number(&mut self, number: i32);
}

impl Numbered for Track {
    fn track_id(&self) -> TrackId {
        self.id
    }

    fn set_number(&mut self, number: i32) {
        self.number = Some(number);
    }
}

/// Append `new_ids` after all existing entries, in the given order
pub fn add_tracks<T: Clone>(sequence: &[T], new_ids: &[T]) -> Vec<T> {
    let mut result = Vec::with_capacity(sequence.len() + new_ids.len());
    result.extend_from_slice(sequence);
    result.extend_from_slice(new_ids);
    result
}

/// Drop the entries at `positions`, keeping the others in their original order
///
/// Positions outside the sequence are ignored and duplicates count once.
pub fn remove_tracks<T: Clone>(sequence: &[T], positions: &[usize]) -> Vec<T> {
    let doomed: HashSet<usize> = positions.iter().copied().collect();
    sequence
        .iter()
        .enumerate()
        .filter(|(index, _)| !doomed.contains(index))
        .map(|(_, item)| item.clone())
        .collect()
}

/// Remove every occurrence of `track_id`
pub fn remove_track_id(sequence: &[TrackId], track_id: TrackId) -> Vec<TrackId> {
    sequence.iter().copied().filter(|id| *id != track_id).collect()
}

/// Move the entry at `from` so that it lands at index `to` of the result
///
/// Valid targets are `0..len`; anything else fails instead of clamping.
pub fn move_track<T: Clone>(
    sequence: &[T],
    from: usize,
    to: usize,
) -> Result<Vec<T>, TrackListError> {
    let len = sequence.len();
    if from >= len {
        return Err(TrackListError::IndexOutOfRange { index: from, len });
    }
    // after removal the sequence has len - 1 entries; inserting at len - 1 appends
    if to >= len {
        return Err(TrackListError::IndexOutOfRange { index: to, len });
    }

    let mut result = sequence.to_vec();
    let moved = result.remove(from);
    result.insert(to, moved);
    Ok(result)
}

/// Materialize the records of `sequence` in playlist order
///
/// Every produced record gets its number overwritten with its 1-based rank in
/// the projection, so a track shows its position on the list rather than its
/// album track number. A duplicated id yields one record per occurrence.
pub fn project<T>(
    sequence: &[TrackId],
    lookup: &HashMap<TrackId, T>,
    policy: DanglingPolicy,
) -> Result<Vec<T>, TrackListError>
where
    T: Numbered + Clone,
{
    let mut projected: Vec<T> = Vec::with_capacity(sequence.len());

    for &track_id in sequence {
        let Some(record) = lookup.get(&track_id) else {
            match policy {
                DanglingPolicy::Skip => {
                    warn!(track_id, "Skipping playlist entry with no matching track");
                    continue;
                }
                DanglingPolicy::Strict => {
                    return Err(TrackListError::DanglingReference(track_id));
                }
            }
        };

        let mut record = record.clone();
        record.set_number(projected.len() as i32 + 1);
        projected.push(record);
    }

    Ok(projected)
}

/// Index records by track id, for use as the `project` lookup
pub fn index_by_id<T: Numbered>(records: impl IntoIterator<Item = T>) -> HashMap<TrackId, T> {
    records
        .into_iter()
        .map(|record| (record.track_id(), record))
        .collect()
}
