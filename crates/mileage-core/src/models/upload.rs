//! Upload status tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::trip::RecordId;

/// Lifecycle of an uploaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

/// A document submitted for trip extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    pub id: RecordId,
    pub user_id: String,
    pub filename: String,
    pub file_size: u64,
    pub status: UploadStatus,
    #[serde(default)]
    pub trips_extracted: usize,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

/// An upload record before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpload {
    pub user_id: String,
    pub filename: String,
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
}

impl NewUpload {
    pub fn into_upload(self, id: RecordId) -> Upload {
        Upload {
            id,
            user_id: self.user_id,
            filename: self.filename,
            file_size: self.file_size,
            status: UploadStatus::Processing,
            trips_extracted: 0,
            created_at: self.created_at,
            processed_at: None,
        }
    }
}

impl Upload {
    pub fn complete(&mut self, trips_extracted: usize, at: DateTime<Utc>) {
        self.status = UploadStatus::Completed;
        self.trips_extracted = trips_extracted;
        self.processed_at = Some(at);
    }

    pub fn fail(&mut self, at: DateTime<Utc>) {
        self.status = UploadStatus::Failed;
        self.processed_at = Some(at);
    }
}
