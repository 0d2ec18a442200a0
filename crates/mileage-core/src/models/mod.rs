//! Data models for trips, gaps, uploads and configuration.

pub mod config;
pub mod gap;
pub mod summary;
pub mod trip;
pub mod upload;

pub use config::MileageConfig;
pub use gap::{Gap, GapResolution, NewGap};
pub use summary::MileageSummary;
pub use trip::{CandidateSource, NewTrip, RecordId, Trip, TripCandidate, TripUpdate};
pub use upload::{NewUpload, Upload, UploadStatus};
