//! In-memory record store.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{GapFilter, MileageStore, Result, SortOrder, TripFilter};
use crate::error::StoreError;
use crate::models::gap::{Gap, GapResolution, NewGap};
use crate::models::trip::{NewTrip, RecordId, Trip, TripUpdate};
use crate::models::upload::{NewUpload, Upload};

/// Full contents of a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    /// Last id handed out. Ids are shared by all collections.
    pub last_id: RecordId,
    pub trips: Vec<Trip>,
    pub gaps: Vec<Gap>,
    pub uploads: Vec<Upload>,
}

impl StoreSnapshot {
    fn next_id(&mut self) -> RecordId {
        self.last_id += 1;
        self.last_id
    }

    fn trip_mut(&mut self, user_id: &str, id: RecordId) -> Result<&mut Trip> {
        self.trips
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .ok_or(StoreError::NotFound { entity: "trip", id })
    }

    fn gap_mut(&mut self, user_id: &str, id: RecordId) -> Result<&mut Gap> {
        self.gaps
            .iter_mut()
            .find(|g| g.id == id && g.user_id == user_id)
            .ok_or(StoreError::NotFound { entity: "gap", id })
    }

    fn upload_mut(&mut self, user_id: &str, id: RecordId) -> Result<&mut Upload> {
        self.uploads
            .iter_mut()
            .find(|u| u.id == id && u.user_id == user_id)
            .ok_or(StoreError::NotFound { entity: "upload", id })
    }
}

/// Store backed by a mutex-guarded snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoreSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing contents.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreSnapshot>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl MileageStore for MemoryStore {
    fn insert_trips(&self, trips: Vec<NewTrip>) -> Result<Vec<Trip>> {
        let mut inner = self.lock()?;
        let stored: Vec<Trip> = trips
            .into_iter()
            .map(|t| {
                let id = inner.next_id();
                t.into_trip(id)
            })
            .collect();
        inner.trips.extend(stored.iter().cloned());
        trace!("Inserted {} trips", stored.len());
        Ok(stored)
    }

    fn get_trip(&self, user_id: &str, id: RecordId) -> Result<Trip> {
        let mut inner = self.lock()?;
        inner.trip_mut(user_id, id).map(|t| t.clone())
    }

    fn update_trip(&self, user_id: &str, id: RecordId, update: &TripUpdate) -> Result<Trip> {
        let mut inner = self.lock()?;
        let trip = inner.trip_mut(user_id, id)?;
        let updated = update.merge(trip);
        *trip = updated.clone();
        Ok(updated)
    }

    fn delete_trip(&self, user_id: &str, id: RecordId) -> Result<()> {
        let mut inner = self.lock()?;
        let before = inner.trips.len();
        inner.trips.retain(|t| !(t.id == id && t.user_id == user_id));
        if inner.trips.len() == before {
            return Err(StoreError::NotFound { entity: "trip", id });
        }
        Ok(())
    }

    fn query_trips(&self, user_id: &str, filter: &TripFilter) -> Result<Vec<Trip>> {
        let inner = self.lock()?;
        let mut trips: Vec<Trip> = inner
            .trips
            .iter()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .cloned()
            .collect();

        match filter.order {
            SortOrder::Ascending => trips.sort_by(|a, b| a.date.cmp(&b.date)),
            SortOrder::Descending => trips.sort_by(|a, b| b.date.cmp(&a.date)),
        }

        if let Some(limit) = filter.limit {
            let offset = filter.page.max(1).saturating_sub(1).saturating_mul(limit);
            trips = trips.into_iter().skip(offset).take(limit).collect();
        }

        Ok(trips)
    }

    fn insert_gaps(&self, gaps: Vec<NewGap>) -> Result<Vec<Gap>> {
        let mut inner = self.lock()?;
        let stored: Vec<Gap> = gaps
            .into_iter()
            .map(|g| {
                let id = inner.next_id();
                g.into_gap(id)
            })
            .collect();
        inner.gaps.extend(stored.iter().cloned());
        trace!("Inserted {} gaps", stored.len());
        Ok(stored)
    }

    fn get_gap(&self, user_id: &str, id: RecordId) -> Result<Gap> {
        let mut inner = self.lock()?;
        inner.gap_mut(user_id, id).map(|g| g.clone())
    }

    fn resolve_gap(&self, user_id: &str, id: RecordId, resolution: &GapResolution) -> Result<Gap> {
        let mut inner = self.lock()?;
        let gap = inner.gap_mut(user_id, id)?;
        gap.resolve(resolution);
        Ok(gap.clone())
    }

    fn query_gaps(&self, user_id: &str, filter: &GapFilter) -> Result<Vec<Gap>> {
        let inner = self.lock()?;
        let mut gaps: Vec<Gap> = inner
            .gaps
            .iter()
            .filter(|g| g.user_id == user_id && filter.matches(g))
            .cloned()
            .collect();
        gaps.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(gaps)
    }

    fn create_upload(&self, upload: NewUpload) -> Result<Upload> {
        let mut inner = self.lock()?;
        let id = inner.next_id();
        let upload = upload.into_upload(id);
        inner.uploads.push(upload.clone());
        Ok(upload)
    }

    fn get_upload(&self, user_id: &str, id: RecordId) -> Result<Upload> {
        let mut inner = self.lock()?;
        inner.upload_mut(user_id, id).map(|u| u.clone())
    }

    fn update_upload(&self, upload: &Upload) -> Result<Upload> {
        let mut inner = self.lock()?;
        let stored = inner.upload_mut(&upload.user_id, upload.id)?;
        *stored = upload.clone();
        Ok(upload.clone())
    }
}
