//! Odometer reading rules.

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::dates::normalize_date;
use super::patterns::{DATE_PAIR, ODOMETER, START_END};
use super::{ExtractionMatch, Reading, TripRule};
use crate::models::trip::CandidateSource;

/// Date token followed by start and end readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatePairRule;

/// `odometer` label followed by two readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct OdometerRule;

/// `start <n> end <n>` labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartEndRule;

impl TripRule for DatePairRule {
    fn source(&self) -> CandidateSource {
        CandidateSource::DatePair
    }

    fn find_all(&self, text: &str, today: NaiveDate) -> Vec<ExtractionMatch<Reading>> {
        scan(&DATE_PAIR, text, |caps| {
            Some(Reading {
                date: normalize_date(&caps[1], today),
                start_mileage: parse_reading(&caps[2])?,
                end_mileage: parse_reading(&caps[3])?,
            })
        })
    }
}

impl TripRule for OdometerRule {
    fn source(&self) -> CandidateSource {
        CandidateSource::Odometer
    }

    fn find_all(&self, text: &str, today: NaiveDate) -> Vec<ExtractionMatch<Reading>> {
        scan(&ODOMETER, text, |caps| labeled_reading(caps, today))
    }
}

impl TripRule for StartEndRule {
    fn source(&self) -> CandidateSource {
        CandidateSource::StartEnd
    }

    fn find_all(&self, text: &str, today: NaiveDate) -> Vec<ExtractionMatch<Reading>> {
        scan(&START_END, text, |caps| labeled_reading(caps, today))
    }
}

fn labeled_reading(caps: &Captures<'_>, today: NaiveDate) -> Option<Reading> {
    Some(Reading {
        date: today,
        start_mileage: parse_reading(&caps[1])?,
        end_mileage: parse_reading(&caps[2])?,
    })
}

fn scan<F>(pattern: &Regex, text: &str, build: F) -> Vec<ExtractionMatch<Reading>>
where
    F: Fn(&Captures<'_>) -> Option<Reading>,
{
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let reading = build(&caps)?;
            let full_match = caps.get(0)?;
            Some(
                ExtractionMatch::new(reading, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            )
        })
        .collect()
}

/// Parse an odometer reading. Values outside `u32` are rejected.
pub fn parse_reading(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}
