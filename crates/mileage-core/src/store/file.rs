//! Record store persisted to a single JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::memory::{MemoryStore, StoreSnapshot};
use super::{GapFilter, MileageStore, Result, TripFilter};
use crate::models::gap::{Gap, GapResolution, NewGap};
use crate::models::trip::{NewTrip, RecordId, Trip, TripUpdate};
use crate::models::upload::{NewUpload, Upload};

/// A [`MemoryStore`] that rewrites its backing file after every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    memory: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                StoreSnapshot::default()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            StoreSnapshot::default()
        };

        debug!(
            "Opened store {} ({} trips, {} gaps, {} uploads)",
            path.display(),
            snapshot.trips.len(),
            snapshot.gaps.len(),
            snapshot.uploads.len()
        );

        Ok(Self {
            path,
            memory: MemoryStore::from_snapshot(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let snapshot = self.memory.snapshot()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target, then rename over it.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&snapshot)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn persist<T>(&self, value: T) -> Result<T> {
        self.flush()?;
        Ok(value)
    }
}

impl MileageStore for JsonFileStore {
    fn insert_trips(&self, trips: Vec<NewTrip>) -> Result<Vec<Trip>> {
        let stored = self.memory.insert_trips(trips)?;
        self.persist(stored)
    }

    fn get_trip(&self, user_id: &str, id: RecordId) -> Result<Trip> {
        self.memory.get_trip(user_id, id)
    }

    fn update_trip(&self, user_id: &str, id: RecordId, update: &TripUpdate) -> Result<Trip> {
        let trip = self.memory.update_trip(user_id, id, update)?;
        self.persist(trip)
    }

    fn delete_trip(&self, user_id: &str, id: RecordId) -> Result<()> {
        self.memory.delete_trip(user_id, id)?;
        self.flush()
    }

    fn query_trips(&self, user_id: &str, filter: &TripFilter) -> Result<Vec<Trip>> {
        self.memory.query_trips(user_id, filter)
    }

    fn insert_gaps(&self, gaps: Vec<NewGap>) -> Result<Vec<Gap>> {
        let stored = self.memory.insert_gaps(gaps)?;
        self.persist(stored)
    }

    fn get_gap(&self, user_id: &str, id: RecordId) -> Result<Gap> {
        self.memory.get_gap(user_id, id)
    }

    fn resolve_gap(&self, user_id: &str, id: RecordId, resolution: &GapResolution) -> Result<Gap> {
        let gap = self.memory.resolve_gap(user_id, id, resolution)?;
        self.persist(gap)
    }

    fn query_gaps(&self, user_id: &str, filter: &GapFilter) -> Result<Vec<Gap>> {
        self.memory.query_gaps(user_id, filter)
    }

    fn create_upload(&self, upload: NewUpload) -> Result<Upload> {
        let upload = self.memory.create_upload(upload)?;
        self.persist(upload)
    }

    fn get_upload(&self, user_id: &str, id: RecordId) -> Result<Upload> {
        self.memory.get_upload(user_id, id)
    }

    fn update_upload(&self, upload: &Upload) -> Result<Upload> {
        let upload = self.memory.update_upload(upload)?;
        self.persist(upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_reopen_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        {
            let store = JsonFileStore::open(&path).unwrap();
            store
                .insert_trips(vec![NewTrip::new("u1", date, 10, 30)])
                .unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        let trips = store.query_trips("u1", &TripFilter::default()).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].end_mileage, 30);

        // Ids continue after the stored maximum.
        let more = store
            .insert_trips(vec![NewTrip::new("u1", date, 30, 40)])
            .unwrap();
        assert_eq!(more[0].id, 2);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.query_gaps("u1", &GapFilter::default()).unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStore::open(&path).is_err());
    }
}
