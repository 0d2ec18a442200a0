//! Detection of undocumented mileage between business trips.

use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use crate::models::gap::NewGap;
use crate::models::trip::Trip;

/// Measurements taken for one pair of adjacent trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairAnalysis {
    /// Whole days from the earlier trip to the later one.
    pub days_between: i64,
    /// Days strictly between the two trips.
    pub actual_days: i64,
    /// Odometer distance not covered by either trip. Negative after a reset.
    pub expected_mileage: i64,
}

impl PairAnalysis {
    /// Measure the span between `current` and `next`.
    pub fn of(current: &Trip, next: &Trip) -> Self {
        let days_between = days_between(current.date, next.date);
        Self {
            days_between,
            actual_days: days_between - 1,
            expected_mileage: i64::from(next.start_mileage) - i64::from(current.end_mileage),
        }
    }

    /// Average daily mileage over the missing span, when the pair is a gap.
    pub fn expected_daily_miles(&self) -> Option<u32> {
        if self.days_between <= 1 || self.expected_mileage <= 0 || self.actual_days <= 0 {
            return None;
        }
        u32::try_from(self.expected_mileage / self.actual_days).ok()
    }
}

/// Scans one user's business trips for under-documented intervals.
#[derive(Debug, Clone, Copy, Default)]
pub struct GapDetector;

impl GapDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect gaps between adjacent trips.
    ///
    /// `trips` must hold one user's business trips sorted ascending by date.
    /// Fewer than two trips yield no gaps. The result does not depend on
    /// previously stored gaps.
    pub fn detect(&self, trips: &[Trip]) -> Vec<NewGap> {
        let mut gaps = Vec::new();

        for pair in trips.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            let analysis = PairAnalysis::of(current, next);

            let Some(expected_miles) = analysis.expected_daily_miles() else {
                continue;
            };
            // A zero average still counts as "no detectable gap".
            if expected_miles == 0 {
                continue;
            }
            let Some(date) = current.date.checked_add_days(Days::new(1)) else {
                continue;
            };

            debug!(
                "Gap after trip {} on {}: {} miles over {} days",
                current.id, date, analysis.expected_mileage, analysis.actual_days
            );

            gaps.push(NewGap {
                user_id: current.user_id.clone(),
                date,
                expected_miles,
                actual_miles: 0,
                resolved: false,
            });
        }

        info!("Detected {} gaps across {} trips", gaps.len(), trips.len());
        gaps
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::NewTrip;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trip(id: u64, date: NaiveDate, start: u32, end: u32) -> Trip {
        NewTrip::new("u1", date, start, end).into_trip(id)
    }

    #[test]
    fn test_gap_between_distant_trips() {
        let trips = vec![
            trip(1, date(2025, 1, 1), 50, 100),
            trip(2, date(2025, 1, 5), 500, 520),
        ];

        let analysis = PairAnalysis::of(&trips[0], &trips[1]);
        assert_eq!(analysis.days_between, 4);
        assert_eq!(analysis.actual_days, 3);
        assert_eq!(analysis.expected_mileage, 400);

        assert_eq!(
            GapDetector::new().detect(&trips),
            vec![NewGap {
                user_id: "u1".to_string(),
                date: date(2025, 1, 2),
                expected_miles: 133,
                actual_miles: 0,
                resolved: false,
            }]
        );
    }

    #[test]
    fn test_consecutive_days_have_no_gap() {
        let trips = vec![
            trip(1, date(2025, 1, 1), 0, 100),
            trip(2, date(2025, 1, 2), 900, 950),
            trip(3, date(2025, 1, 2), 5000, 5001),
        ];
        assert!(GapDetector::new().detect(&trips).is_empty());
    }

    #[test]
    fn test_odometer_reset_has_no_gap() {
        let trips = vec![
            trip(1, date(2025, 1, 1), 90_000, 90_100),
            trip(2, date(2025, 2, 1), 10, 40),
        ];
        assert!(GapDetector::new().detect(&trips).is_empty());
    }

    #[test]
    fn test_contiguous_odometer_has_no_gap() {
        let trips = vec![
            trip(1, date(2025, 1, 1), 0, 100),
            trip(2, date(2025, 1, 10), 100, 130),
        ];
        assert!(GapDetector::new().detect(&trips).is_empty());
    }

    #[test]
    fn test_small_distance_over_long_span_is_skipped() {
        // 5 miles over 9 missing days averages to zero
        let trips = vec![
            trip(1, date(2025, 1, 1), 0, 100),
            trip(2, date(2025, 1, 11), 105, 130),
        ];
        assert!(GapDetector::new().detect(&trips).is_empty());
    }

    #[test]
    fn test_short_input() {
        assert!(GapDetector::new().detect(&[]).is_empty());
        assert!(GapDetector::new().detect(&[trip(1, date(2025, 1, 1), 0, 10)]).is_empty());
    }

    #[test]
    fn test_multiple_gaps_and_determinism() {
        let trips = vec![
            trip(1, date(2025, 3, 1), 1000, 1010),
            trip(2, date(2025, 3, 3), 1030, 1040),
            trip(3, date(2025, 3, 4), 1040, 1050),
            trip(4, date(2025, 3, 31), 1860, 1900),
        ];

        let detector = GapDetector::new();
        let first = detector.detect(&trips);
        let second = detector.detect(&trips);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].date, date(2025, 3, 2));
        assert_eq!(first[0].expected_miles, 20);
        assert_eq!(first[1].date, date(2025, 3, 5));
        assert_eq!(first[1].expected_miles, 31);
        assert!(first.iter().all(|g| g.expected_miles > 0 && !g.resolved));
    }

    #[test]
    fn test_gap_date_crosses_month_end() {
        let trips = vec![
            trip(1, date(2024, 2, 28), 0, 10),
            trip(2, date(2024, 3, 3), 70, 80),
        ];
        let gaps = GapDetector::new().detect(&trips);
        assert_eq!(gaps[0].date, date(2024, 2, 29));
        assert_eq!(gaps[0].expected_miles, 20);
    }
}
