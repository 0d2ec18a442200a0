//! Gap records produced by gap detection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trip::RecordId;

/// A detected gap, ready for batch insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGap {
    pub user_id: String,

    /// First day after the earlier trip.
    pub date: NaiveDate,

    /// Average daily mileage over the missing span.
    pub expected_miles: u32,

    /// Mileage the user reports once the gap is reviewed.
    pub actual_miles: u32,

    pub resolved: bool,
}

impl NewGap {
    pub fn into_gap(self, id: RecordId) -> Gap {
        Gap {
            id,
            user_id: self.user_id,
            date: self.date,
            expected_miles: self.expected_miles,
            actual_miles: self.actual_miles,
            resolved: self.resolved,
            notes: None,
        }
    }
}

/// A stored gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub id: RecordId,
    pub user_id: String,
    pub date: NaiveDate,
    pub expected_miles: u32,
    #[serde(default)]
    pub actual_miles: u32,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// User review of a gap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapResolution {
    /// Real mileage driven during the gap, if known.
    pub actual_miles: Option<u32>,
    pub notes: Option<String>,
}

impl Gap {
    /// Mark resolved, keeping existing values for fields the resolution omits.
    pub fn resolve(&mut self, resolution: &GapResolution) {
        self.resolved = true;
        if let Some(actual) = resolution.actual_miles {
            self.actual_miles = actual;
        }
        if let Some(notes) = resolution.notes.as_ref().filter(|n| !n.is_empty()) {
            self.notes = Some(notes.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_omitted_fields() {
        let mut gap = NewGap {
            user_id: "u1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            expected_miles: 133,
            actual_miles: 0,
            resolved: false,
        }
        .into_gap(1);
        gap.notes = Some("client visit".to_string());

        gap.resolve(&GapResolution {
            actual_miles: Some(120),
            notes: Some(String::new()),
        });

        assert!(gap.resolved);
        assert_eq!(gap.actual_miles, 120);
        assert_eq!(gap.notes.as_deref(), Some("client visit"));
    }
}
