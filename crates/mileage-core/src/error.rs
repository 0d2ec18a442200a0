//! Error types for the mileage-core library.

use thiserror::Error;

/// Main error type for the mileage library.
#[derive(Error, Debug)]
pub enum MileageError {
    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Document loading error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Input validation error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by a record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with this id exists for the caller.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    /// The store cannot be reached or is in a bad state.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Failed to read or write the backing file.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode the backing file.
    #[error("store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors related to loading document text for extraction.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// File type is not accepted for upload.
    #[error("unsupported document type: {0}")]
    UnsupportedType(String),

    /// File exceeds the configured size limit.
    #[error("document is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// The document contains no data.
    #[error("document is empty")]
    Empty,

    /// Failed to recover text from the document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),
}

/// Errors related to caller-supplied trip or gap data.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// End reading is lower than the start reading.
    #[error("end mileage {end} must be greater than or equal to start mileage {start}")]
    EndBeforeStart { start: u32, end: u32 },

    /// Date string is not a calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Result type for the mileage library.
pub type Result<T> = std::result::Result<T, MileageError>;
