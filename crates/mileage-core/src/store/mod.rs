//! Record store for trips, gaps and uploads.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::{MemoryStore, StoreSnapshot};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::gap::{Gap, GapResolution, NewGap};
use crate::models::trip::{NewTrip, RecordId, Trip, TripUpdate};
use crate::models::upload::{NewUpload, Upload};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Default page size for trip listings.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Sort direction by date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Trip query. Date bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripFilter {
    pub business: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub order: SortOrder,
    /// 1-based page number.
    pub page: usize,
    /// Page size; `None` returns every match.
    pub limit: Option<usize>,
}

impl Default for TripFilter {
    fn default() -> Self {
        Self {
            business: None,
            start_date: None,
            end_date: None,
            order: SortOrder::Descending,
            page: 1,
            limit: Some(DEFAULT_PAGE_LIMIT),
        }
    }
}

impl TripFilter {
    /// All business trips, oldest first, unpaginated. The gap detector input.
    pub fn business_ascending() -> Self {
        Self {
            business: Some(true),
            order: SortOrder::Ascending,
            limit: None,
            ..Default::default()
        }
    }

    /// Every trip in a date range, unpaginated.
    pub fn all_between(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
            order: SortOrder::Ascending,
            limit: None,
            ..Default::default()
        }
    }

    pub fn matches(&self, trip: &Trip) -> bool {
        self.business.is_none_or(|b| trip.business == b)
            && in_range(trip.date, self.start_date, self.end_date)
    }
}

/// Gap query. Results are newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GapFilter {
    pub resolved: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl GapFilter {
    pub fn unresolved() -> Self {
        Self {
            resolved: Some(false),
            ..Default::default()
        }
    }

    pub fn matches(&self, gap: &Gap) -> bool {
        self.resolved.is_none_or(|r| gap.resolved == r)
            && in_range(gap.date, self.start_date, self.end_date)
    }
}

fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

/// Persistence for the three record collections.
///
/// Every read and write is scoped by `user_id`; a record owned by another
/// user is reported as `NotFound`.
pub trait MileageStore: Send + Sync {
    /// Insert trips as a batch and return them with ids.
    fn insert_trips(&self, trips: Vec<NewTrip>) -> Result<Vec<Trip>>;

    fn get_trip(&self, user_id: &str, id: RecordId) -> Result<Trip>;

    fn update_trip(&self, user_id: &str, id: RecordId, update: &TripUpdate) -> Result<Trip>;

    fn delete_trip(&self, user_id: &str, id: RecordId) -> Result<()>;

    fn query_trips(&self, user_id: &str, filter: &TripFilter) -> Result<Vec<Trip>>;

    /// Insert gaps as a batch and return them with ids.
    fn insert_gaps(&self, gaps: Vec<NewGap>) -> Result<Vec<Gap>>;

    fn get_gap(&self, user_id: &str, id: RecordId) -> Result<Gap>;

    /// Mark a gap resolved.
    fn resolve_gap(&self, user_id: &str, id: RecordId, resolution: &GapResolution) -> Result<Gap>;

    fn query_gaps(&self, user_id: &str, filter: &GapFilter) -> Result<Vec<Gap>>;

    fn create_upload(&self, upload: NewUpload) -> Result<Upload>;

    fn get_upload(&self, user_id: &str, id: RecordId) -> Result<Upload>;

    /// Replace a stored upload record.
    fn update_upload(&self, upload: &Upload) -> Result<Upload>;
}
