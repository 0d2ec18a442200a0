//! Rule-based recognizers for odometer readings in document text.

pub mod dates;
pub mod patterns;
pub mod readings;

pub use dates::{normalize_date, parse_date};
pub use readings::{parse_reading, DatePairRule, OdometerRule, StartEndRule};

use chrono::NaiveDate;

use crate::models::trip::CandidateSource;

/// A pair of odometer readings recognized in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub date: NaiveDate,
    pub start_mileage: u32,
    pub end_mileage: u32,
}

impl Reading {
    /// Readings describe a trip only when the odometer moved forward.
    pub fn is_forward(&self) -> bool {
        self.end_mileage > self.start_mileage
    }
}

/// Trait for trip recognition rules.
pub trait TripRule: Send + Sync {
    /// Which candidate source this rule reports.
    fn source(&self) -> CandidateSource;

    /// Find every reading in `text`. `today` fills in missing dates.
    fn find_all(&self, text: &str, today: NaiveDate) -> Vec<ExtractionMatch<Reading>>;
}

/// A recognized value with the text it came from.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// The built-in rules in priority order.
pub fn default_rules() -> Vec<Box<dyn TripRule>> {
    vec![
        Box::new(DatePairRule),
        Box::new(OdometerRule),
        Box::new(StartEndRule),
    ]
}
