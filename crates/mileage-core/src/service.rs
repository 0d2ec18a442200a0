//! Request-level operations over a record store.
//!
//! The service plays the part of the request handlers: it receives an
//! already-identified user, runs the pure detection/extraction logic, and
//! talks to the store. Persistence failures after a computation are reported
//! alongside the computed result instead of replacing it.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::document::{DocumentKind, DocumentLoader, TextLoader};
use crate::error::{DocumentError, Result, StoreError, ValidationError};
use crate::extract::{ExtractionResult, TripExtractor};
use crate::gaps::GapDetector;
use crate::models::config::MileageConfig;
use crate::models::gap::{Gap, GapResolution, NewGap};
use crate::models::summary::MileageSummary;
use crate::models::trip::{NewTrip, RecordId, Trip, TripCandidate, TripUpdate};
use crate::models::upload::{NewUpload, Upload};
use crate::store::{GapFilter, MileageStore, TripFilter};

/// Outcome of a gap detection run.
#[derive(Debug, Clone, Serialize)]
pub struct GapDetectionReport {
    /// Gaps computed from the current trips.
    pub gaps: Vec<NewGap>,
    /// Gaps as stored, with ids. Empty when persistence failed.
    pub stored: Vec<Gap>,
    /// Detected gaps dropped because their date already had a stored gap.
    pub skipped_known: usize,
    /// Store failures hit after detection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

impl GapDetectionReport {
    pub fn gaps_detected(&self) -> usize {
        self.gaps.len()
    }
}

/// Outcome of processing one uploaded document.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub upload: Upload,
    pub candidates: Vec<TripCandidate>,
    /// True when the candidates are the placeholder trip.
    pub fallback_used: bool,
    /// Candidates as stored trips. Empty when persistence failed.
    pub stored_trips: Vec<Trip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Trip, gap, upload and summary operations for identified users.
pub struct MileageService<S> {
    store: S,
    config: MileageConfig,
    clock: Box<dyn Clock>,
    loader: Box<dyn DocumentLoader>,
    detector: GapDetector,
    extractor: TripExtractor,
}

impl<S: MileageStore> MileageService<S> {
    /// Create a service using the system clock and the default document loader.
    pub fn new(store: S, config: MileageConfig) -> Self {
        Self {
            store,
            config,
            clock: Box::new(SystemClock),
            loader: Box::new(TextLoader),
            detector: GapDetector::new(),
            extractor: TripExtractor::new(),
        }
    }

    /// Use a different clock for processing dates and timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Use a different document loader.
    pub fn with_loader(mut self, loader: impl DocumentLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &MileageConfig {
        &self.config
    }

    /// Current processing date.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ---------------------------
    // Trips
    // ---------------------------

    pub fn create_trip(&self, trip: NewTrip) -> Result<Trip> {
        trip.validate()?;
        let mut stored = self.store.insert_trips(vec![trip])?;
        let trip = stored
            .pop()
            .ok_or_else(|| StoreError::Unavailable("insert returned no trip".to_string()))?;
        info!("Created trip {} for {}", trip.id, trip.user_id);
        Ok(trip)
    }

    pub fn get_trip(&self, user_id: &str, id: RecordId) -> Result<Trip> {
        Ok(self.store.get_trip(user_id, id)?)
    }

    pub fn list_trips(&self, user_id: &str, filter: &TripFilter) -> Result<Vec<Trip>> {
        Ok(self.store.query_trips(user_id, filter)?)
    }

    pub fn update_trip(&self, user_id: &str, id: RecordId, update: &TripUpdate) -> Result<Trip> {
        if update.is_empty() {
            return Err(ValidationError::MissingField("at least one trip field".to_string()).into());
        }
        let current = self.store.get_trip(user_id, id)?;
        update.apply(&current)?;
        Ok(self.store.update_trip(user_id, id, update)?)
    }

    pub fn delete_trip(&self, user_id: &str, id: RecordId) -> Result<()> {
        self.store.delete_trip(user_id, id)?;
        info!("Deleted trip {} for {}", id, user_id);
        Ok(())
    }

    // ---------------------------
    // Gaps
    // ---------------------------

    /// Run gap detection over the user's business trips and store the result.
    pub fn detect_gaps(&self, user_id: &str) -> Result<GapDetectionReport> {
        let trips = self
            .store
            .query_trips(user_id, &TripFilter::business_ascending())?;
        let mut gaps = self.detector.detect(&trips);

        let mut store_errors = Vec::new();
        let mut skipped_known = 0;
        if self.config.gaps.skip_known_dates && !gaps.is_empty() {
            match self.store.query_gaps(user_id, &GapFilter::default()) {
                Ok(existing) => {
                    let known: HashSet<NaiveDate> = existing.into_iter().map(|g| g.date).collect();
                    let before = gaps.len();
                    gaps.retain(|g| !known.contains(&g.date));
                    skipped_known = before - gaps.len();
                    debug!("Skipped {} gaps on already recorded dates", skipped_known);
                }
                Err(e) => {
                    error!("Known gap lookup failed for {}: {}", user_id, e);
                    store_errors.push(e.to_string());
                }
            }
        }

        let stored = if gaps.is_empty() {
            Vec::new()
        } else {
            match self.store.insert_gaps(gaps.clone()) {
                Ok(stored) => stored,
                Err(e) => {
                    error!("Gap insertion failed for {}: {}", user_id, e);
                    store_errors.push(e.to_string());
                    Vec::new()
                }
            }
        };
        let persist_error = (!store_errors.is_empty()).then(|| store_errors.join("; "));

        info!("Gap detection for {} found {} gaps", user_id, gaps.len());

        Ok(GapDetectionReport {
            gaps,
            stored,
            skipped_known,
            persist_error,
        })
    }

    pub fn list_gaps(&self, user_id: &str, filter: &GapFilter) -> Result<Vec<Gap>> {
        Ok(self.store.query_gaps(user_id, filter)?)
    }

    /// Mark a gap reviewed, optionally recording the real mileage.
    pub fn resolve_gap(
        &self,
        user_id: &str,
        id: RecordId,
        resolution: &GapResolution,
    ) -> Result<Gap> {
        let gap = self.store.resolve_gap(user_id, id, resolution)?;
        info!("Resolved gap {} for {}", id, user_id);
        Ok(gap)
    }

    // ---------------------------
    // Extraction and uploads
    // ---------------------------

    /// Extract trip candidates from text without storing anything.
    pub fn extract_text(&self, text: &str) -> ExtractionResult {
        self.extractor.parse(text, self.today())
    }

    /// Check an upload against the configured type and size limits.
    pub fn validate_upload(&self, filename: &str, size: u64) -> Result<DocumentKind> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if !self.config.accepts_extension(extension) {
            return Err(DocumentError::UnsupportedType(filename.to_string()).into());
        }

        let limit = self.config.upload.max_file_size;
        if size > limit {
            return Err(DocumentError::TooLarge { size, limit }.into());
        }

        Ok(DocumentKind::from_filename(filename)?)
    }

    /// Process an uploaded document: extract trips, store them, track status.
    pub fn upload_document(
        &self,
        user_id: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<UploadReport> {
        let file_size = data.len() as u64;
        let kind = self.validate_upload(filename, file_size)?;

        let mut upload = self.store.create_upload(NewUpload {
            user_id: user_id.to_string(),
            filename: filename.to_string(),
            file_size,
            created_at: self.clock.now(),
        })?;
        info!("Processing upload {} ({}, {} bytes)", upload.id, filename, file_size);

        let text = match self.loader.load_text(kind, data) {
            Ok(text) => text,
            Err(e) => {
                warn!("Upload {} failed: {}", upload.id, e);
                upload.fail(self.clock.now());
                if let Err(store_err) = self.store.update_upload(&upload) {
                    error!("Could not mark upload {} failed: {}", upload.id, store_err);
                }
                return Err(e.into());
            }
        };

        let extraction = self.extractor.parse(&text, self.today());
        let new_trips: Vec<NewTrip> = extraction
            .candidates
            .iter()
            .cloned()
            .map(|c| c.into_new_trip(user_id))
            .collect();

        let mut store_errors = Vec::new();
        let stored_trips = match self.store.insert_trips(new_trips) {
            Ok(stored) => stored,
            Err(e) => {
                error!("Trip insertion failed for upload {}: {}", upload.id, e);
                store_errors.push(e.to_string());
                Vec::new()
            }
        };

        upload.complete(extraction.candidates.len(), self.clock.now());
        let upload = match self.store.update_upload(&upload) {
            Ok(updated) => updated,
            Err(e) => {
                error!("Could not mark upload {} completed: {}", upload.id, e);
                store_errors.push(e.to_string());
                upload
            }
        };
        let persist_error = (!store_errors.is_empty()).then(|| store_errors.join("; "));

        Ok(UploadReport {
            upload,
            candidates: extraction.candidates,
            fallback_used: extraction.fallback_used,
            stored_trips,
            persist_error,
            warnings: extraction.warnings,
        })
    }

    // ---------------------------
    // Summary
    // ---------------------------

    /// Mileage totals for trips within the optional inclusive date range.
    pub fn summary(
        &self,
        user_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<MileageSummary> {
        let trips = self
            .store
            .query_trips(user_id, &TripFilter::all_between(start_date, end_date))?;
        let gaps = self.store.query_gaps(user_id, &GapFilter::unresolved())?;
        Ok(MileageSummary::from_records(&trips, gaps))
    }
}
