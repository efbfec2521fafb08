//! Shared API request/response types
//!
//! Field names follow the camelCase JSON used by the library server.

use serde::{Deserialize, Serialize};

use crate::models::FileId;

// ========================================
// Scan Types
// ========================================

/// `GET /scanstate` response
///
/// # Examples
///
/// ```
/// use tunesync_common::api::ScanState;
///
/// let state: ScanState =
///     serde_json::from_str(r#"{"scannedCount": 120, "unscannedFiles": [4, 8, 15]}"#).unwrap();
/// assert_eq!(state.scanned_count, 120);
/// assert_eq!(state.unscanned_files, vec![4, 8, 15]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanState {
    /// Audio files already present in the library
    pub scanned_count: usize,
    /// Audio files found in the user's tree but not scanned yet
    #[serde(default)]
    pub unscanned_files: Vec<FileId>,
}

/// `POST /scan` request body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScanRequest {
    /// Comma-joined file ids of this batch
    pub files: String,
    /// True on the batch that reaches the end of the pending list
    pub finalize: bool,
}

impl ScanRequest {
    pub fn new(files: &[FileId], finalize: bool) -> Self {
        Self {
            files: files
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(","),
            finalize,
        }
    }

    /// File ids carried by the request; malformed entries are dropped
    pub fn file_ids(&self) -> Vec<FileId> {
        self.files
            .split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect()
    }
}

/// `POST /scan` response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanBatchResult {
    /// Files of the batch that were added to the library
    pub files_scanned: usize,
    /// Whether any album got a cover image as a side effect
    #[serde(default)]
    pub covers_updated: bool,
}

impl ScanBatchResult {
    /// The batch changed something the library view should show
    pub fn has_updates(&self) -> bool {
        self.files_scanned > 0 || self.covers_updated
    }
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_request_joins_ids() {
        let request = ScanRequest::new(&[11, 12, 13], true);
        assert_eq!(request.files, "11,12,13");

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"files":"11,12,13","finalize":true}"#);
    }

    #[test]
    fn test_scan_request_file_ids() {
        let request = ScanRequest {
            files: "4, 5,,x,6".to_string(),
            finalize: false,
        };
        assert_eq!(request.file_ids(), vec![4, 5, 6]);
    }

    #[test]
    fn test_scan_state_defaults_missing_list() {
        let state: ScanState = serde_json::from_str(r#"{"scannedCount": 3}"#).unwrap();
        assert_eq!(state.scanned_count, 3);
        assert!(state.unscanned_files.is_empty());
    }

    #[test]
    fn test_batch_result_updates() {
        let result: ScanBatchResult =
            serde_json::from_str(r#"{"filesScanned": 0, "coversUpdated": true}"#).unwrap();
        assert!(result.has_updates());
        assert!(!ScanBatchResult::default().has_updates());
    }
}
