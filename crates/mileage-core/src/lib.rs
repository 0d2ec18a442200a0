//! Core library for mileage logs.
//!
//! This crate provides:
//! - Gap detection between consecutive business trips
//! - Trip extraction from unstructured document text (dates, odometer readings)
//! - Document text loading (plain text, PDF with the `pdf` feature)
//! - Trip, gap and upload records with an in-memory or JSON file store
//! - A service layer tying detection, extraction and storage together

pub mod clock;
pub mod document;
pub mod error;
pub mod extract;
pub mod gaps;
pub mod models;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{DocumentKind, DocumentLoader, TextLoader};
pub use error::{DocumentError, MileageError, Result, StoreError, ValidationError};
pub use extract::{ExtractionResult, TripExtractor};
pub use gaps::GapDetector;
pub use models::{
    CandidateSource, Gap, GapResolution, MileageConfig, MileageSummary, NewGap, NewTrip, Trip,
    TripCandidate, TripUpdate, Upload, UploadStatus,
};
pub use service::{GapDetectionReport, MileageService, UploadReport};
pub use store::{GapFilter, JsonFileStore, MemoryStore, MileageStore, SortOrder, TripFilter};
