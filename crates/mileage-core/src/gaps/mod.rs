//! Gap detection over ordered business trips.

mod detector;

pub use detector::{GapDetector, PairAnalysis};
