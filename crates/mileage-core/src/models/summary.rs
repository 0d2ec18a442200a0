//! Mileage totals for a user.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::gap::Gap;
use super::trip::Trip;

/// Aggregated mileage figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageSummary {
    pub total_miles: u64,
    pub business_miles: u64,
    pub personal_miles: u64,
    pub total_trips: usize,
    pub business_trips: usize,
    pub personal_trips: usize,
    /// Rounded average miles per business trip.
    pub avg_business_miles: u64,
    /// Rounded average miles per personal trip.
    pub avg_personal_miles: u64,
    pub first_trip_date: Option<NaiveDate>,
    pub last_trip_date: Option<NaiveDate>,
    pub unresolved_gaps: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gaps: Vec<Gap>,
}

impl MileageSummary {
    /// Build a summary from a user's trips and unresolved gaps.
    pub fn from_records(trips: &[Trip], unresolved_gaps: Vec<Gap>) -> Self {
        let (business, personal): (Vec<&Trip>, Vec<&Trip>) =
            trips.iter().partition(|t| t.business);

        let business_miles = total_miles(&business);
        let personal_miles = total_miles(&personal);

        Self {
            total_miles: business_miles + personal_miles,
            business_miles,
            personal_miles,
            total_trips: trips.len(),
            business_trips: business.len(),
            personal_trips: personal.len(),
            avg_business_miles: rounded_average(business_miles, business.len()),
            avg_personal_miles: rounded_average(personal_miles, personal.len()),
            first_trip_date: trips.iter().map(|t| t.date).min(),
            last_trip_date: trips.iter().map(|t| t.date).max(),
            unresolved_gaps: unresolved_gaps.len(),
            gaps: unresolved_gaps,
        }
    }
}

fn total_miles(trips: &[&Trip]) -> u64 {
    trips.iter().map(|t| u64::from(t.miles())).sum()
}

fn rounded_average(miles: u64, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    let count = count as u64;
    (miles + count / 2) / count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::NewTrip;

    fn trip(id: u64, day: u32, start: u32, end: u32, business: bool) -> Trip {
        NewTrip::new("u1", NaiveDate::from_ymd_opt(2025, 3, day).unwrap(), start, end)
            .with_business(business)
            .into_trip(id)
    }

    #[test]
    fn test_summary_totals() {
        let trips = vec![
            trip(1, 10, 100, 150, true),
            trip(2, 2, 150, 175, false),
            trip(3, 20, 200, 201, true),
        ];

        let summary = MileageSummary::from_records(&trips, Vec::new());

        assert_eq!(summary.total_miles, 76);
        assert_eq!(summary.business_miles, 51);
        assert_eq!(summary.personal_miles, 25);
        assert_eq!(summary.business_trips, 2);
        assert_eq!(summary.avg_business_miles, 26);
        assert_eq!(summary.avg_personal_miles, 25);
        assert_eq!(summary.first_trip_date, NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(summary.last_trip_date, NaiveDate::from_ymd_opt(2025, 3, 20));
    }

    #[test]
    fn test_empty_summary() {
        let summary = MileageSummary::from_records(&[], Vec::new());
        assert_eq!(summary, MileageSummary::default());
    }
}
