//! Trip records and extraction candidates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Opaque record identifier assigned by the store.
pub type RecordId = u64;

/// One recorded driving interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Store-assigned identifier.
    pub id: RecordId,

    /// Owner of the trip.
    pub user_id: String,

    /// Calendar date of the trip.
    pub date: NaiveDate,

    /// Odometer reading at the start.
    pub start_mileage: u32,

    /// Odometer reading at the end (never below `start_mileage`).
    pub end_mileage: u32,

    /// Work-related trip.
    pub business: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Trip {
    /// Distance covered by this trip.
    pub fn miles(&self) -> u32 {
        self.end_mileage.saturating_sub(self.start_mileage)
    }
}

/// A trip that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrip {
    pub user_id: String,
    pub date: NaiveDate,
    pub start_mileage: u32,
    pub end_mileage: u32,
    #[serde(default = "default_business")]
    pub business: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_business() -> bool {
    true
}

impl NewTrip {
    /// Create a business trip with no location or notes.
    pub fn new(
        user_id: impl Into<String>,
        date: NaiveDate,
        start_mileage: u32,
        end_mileage: u32,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            start_mileage,
            end_mileage,
            business: true,
            location: None,
            notes: None,
        }
    }

    /// Mark the trip as personal or business.
    pub fn with_business(mut self, business: bool) -> Self {
        self.business = business;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check the odometer invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("user_id".to_string()));
        }
        check_readings(self.start_mileage, self.end_mileage)
    }

    /// Attach a store identifier.
    pub fn into_trip(self, id: RecordId) -> Trip {
        Trip {
            id,
            user_id: self.user_id,
            date: self.date,
            start_mileage: self.start_mileage,
            end_mileage: self.end_mileage,
            business: self.business,
            location: self.location,
            notes: self.notes,
        }
    }
}

/// Partial update of a stored trip. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripUpdate {
    pub date: Option<NaiveDate>,
    pub start_mileage: Option<u32>,
    pub end_mileage: Option<u32>,
    pub business: Option<bool>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl TripUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.start_mileage.is_none()
            && self.end_mileage.is_none()
            && self.business.is_none()
            && self.location.is_none()
            && self.notes.is_none()
    }

    /// Copy of `trip` with the given fields replaced.
    pub fn merge(&self, trip: &Trip) -> Trip {
        Trip {
            id: trip.id,
            user_id: trip.user_id.clone(),
            date: self.date.unwrap_or(trip.date),
            start_mileage: self.start_mileage.unwrap_or(trip.start_mileage),
            end_mileage: self.end_mileage.unwrap_or(trip.end_mileage),
            business: self.business.unwrap_or(trip.business),
            location: self.location.clone().or_else(|| trip.location.clone()),
            notes: self.notes.clone().or_else(|| trip.notes.clone()),
        }
    }

    /// Merge into `trip`, rejecting results that break the odometer invariant.
    pub fn apply(&self, trip: &Trip) -> Result<Trip, ValidationError> {
        let updated = self.merge(trip);
        check_readings(updated.start_mileage, updated.end_mileage)?;
        Ok(updated)
    }
}

fn check_readings(start: u32, end: u32) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }
    Ok(())
}

/// Which recognition rule produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Date followed by two readings (`1/15/2025 45230 45480`).
    DatePair,
    /// `Odometer: 45230 - 45480`.
    Odometer,
    /// `Start: 45230 End: 45480`.
    StartEnd,
    /// Placeholder emitted when nothing matched.
    Fallback,
}

impl CandidateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateSource::DatePair => "date_pair",
            CandidateSource::Odometer => "odometer",
            CandidateSource::StartEnd => "start_end",
            CandidateSource::Fallback => "fallback",
        }
    }
}

/// A trip inferred from document text, not yet attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripCandidate {
    pub date: NaiveDate,
    pub start_mileage: u32,
    pub end_mileage: u32,
    pub business: bool,
    pub location: String,
    pub notes: String,

    /// Rule that produced the candidate.
    pub source: CandidateSource,

    /// Text the rule matched (empty for the fallback).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub matched_text: String,
}

impl TripCandidate {
    pub fn miles(&self) -> u32 {
        self.end_mileage.saturating_sub(self.start_mileage)
    }

    /// Convert into an insertable trip owned by `user_id`.
    pub fn into_new_trip(self, user_id: impl Into<String>) -> NewTrip {
        NewTrip {
            user_id: user_id.into(),
            date: self.date,
            start_mileage: self.start_mileage,
            end_mileage: self.end_mileage,
            business: self.business,
            location: Some(self.location),
            notes: Some(self.notes),
        }
    }
}
