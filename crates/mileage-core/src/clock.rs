//! Source of the current processing date.

use chrono::{DateTime, NaiveDate, Utc};

/// Supplies "today" and "now" so date defaults stay deterministic under test.
pub trait Clock: Send + Sync {
    /// Current timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Current processing date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }

    /// Midnight UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
