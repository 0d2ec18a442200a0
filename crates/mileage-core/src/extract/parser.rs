//! Pattern-based trip extraction from document text.

use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::trip::{CandidateSource, TripCandidate};

use super::rules::{default_rules, TripRule};

/// Location recorded on every extracted candidate.
pub const EXTRACTED_LOCATION: &str = "Extracted from PDF";
/// Notes recorded on every extracted candidate.
pub const EXTRACTED_NOTES: &str = "Auto-extracted from PDF upload";

/// Location of the placeholder trip emitted when nothing matched.
pub const FALLBACK_LOCATION: &str = "Sample trip from PDF";
/// Notes of the placeholder trip emitted when nothing matched.
pub const FALLBACK_NOTES: &str = "Auto-generated sample trip";
pub const FALLBACK_START_MILEAGE: u32 = 1000;
pub const FALLBACK_END_MILEAGE: u32 = 1050;

/// Result of trip extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Accepted candidates in discovery order, or the single placeholder.
    pub candidates: Vec<TripCandidate>,
    /// True when no rule produced a usable reading.
    pub fallback_used: bool,
    /// Matches discarded because the odometer did not move forward.
    pub rejected: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Scans text with an ordered list of rules and turns matches into trips.
pub struct TripExtractor {
    rules: Vec<Box<dyn TripRule>>,
}

impl TripExtractor {
    /// Create an extractor with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Create an extractor with custom rules, applied in the given order.
    pub fn with_rules(rules: Vec<Box<dyn TripRule>>) -> Self {
        Self { rules }
    }

    /// Extract trip candidates. Never empty: falls back to a placeholder trip.
    pub fn extract(&self, text: &str, today: NaiveDate) -> Vec<TripCandidate> {
        self.parse(text, today).candidates
    }

    /// Extract trip candidates with diagnostics.
    pub fn parse(&self, text: &str, today: NaiveDate) -> ExtractionResult {
        let start = Instant::now();
        let mut candidates = Vec::new();
        let mut rejected = 0;
        let mut warnings = Vec::new();

        debug!("Scanning {} characters of text with {} rules", text.len(), self.rules.len());

        // Every rule runs over the whole text; no short-circuit.
        for rule in &self.rules {
            let source = rule.source();
            let matches = rule.find_all(text, today);
            debug!("Rule {} matched {} times", source.as_str(), matches.len());

            for m in matches {
                if !m.value.is_forward() {
                    rejected += 1;
                    warnings.push(format!(
                        "Ignored {:?}: end mileage {} is not above start mileage {}",
                        m.source, m.value.end_mileage, m.value.start_mileage
                    ));
                    continue;
                }

                candidates.push(TripCandidate {
                    date: m.value.date,
                    start_mileage: m.value.start_mileage,
                    end_mileage: m.value.end_mileage,
                    business: true,
                    location: EXTRACTED_LOCATION.to_string(),
                    notes: EXTRACTED_NOTES.to_string(),
                    source,
                    matched_text: m.source,
                });
            }
        }

        let fallback_used = candidates.is_empty();
        if fallback_used {
            warnings.push("No mileage readings recognized, using a sample trip".to_string());
            candidates.push(fallback_candidate(today));
        }

        info!(
            "Extracted {} trip candidates ({} rejected, fallback: {})",
            candidates.len(),
            rejected,
            fallback_used
        );

        ExtractionResult {
            candidates,
            fallback_used,
            rejected,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for TripExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// The placeholder trip returned when no rule matched.
pub fn fallback_candidate(today: NaiveDate) -> TripCandidate {
    TripCandidate {
        date: today,
        start_mileage: FALLBACK_START_MILEAGE,
        end_mileage: FALLBACK_END_MILEAGE,
        business: true,
        location: FALLBACK_LOCATION.to_string(),
        notes: FALLBACK_NOTES.to_string(),
        source: CandidateSource::Fallback,
        matched_text: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_extract_date_pair_line() {
        let candidates = TripExtractor::new().extract("01/15/2025 45230 45480", today());

        assert_eq!(
            candidates,
            vec![TripCandidate {
                date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                start_mileage: 45230,
                end_mileage: 45480,
                business: true,
                location: EXTRACTED_LOCATION.to_string(),
                notes: EXTRACTED_NOTES.to_string(),
                source: CandidateSource::DatePair,
                matched_text: "01/15/2025 45230 45480".to_string(),
            }]
        );
    }

    #[test]
    fn test_no_match_yields_single_fallback() {
        for text in ["", "Quarterly fuel receipts, nothing else", "odometer broken"] {
            let result = TripExtractor::new().parse(text, today());

            assert!(result.fallback_used);
            assert_eq!(result.candidates, vec![fallback_candidate(today())]);
            assert_eq!(result.candidates[0].start_mileage, 1000);
            assert_eq!(result.candidates[0].end_mileage, 1050);
            assert_eq!(result.candidates[0].location, "Sample trip from PDF");
        }
    }

    #[test]
    fn test_rules_run_in_priority_order() {
        let text = "\
            Start: 10 End: 25\n\
            Odometer: 500 - 560\n\
            3/2/2025 900 950\n";

        let candidates = TripExtractor::new().extract(text, today());
        let sources: Vec<CandidateSource> = candidates.iter().map(|c| c.source).collect();

        assert_eq!(
            sources,
            vec![
                CandidateSource::DatePair,
                CandidateSource::Odometer,
                CandidateSource::StartEnd,
            ]
        );
        assert_eq!(candidates[1].date, today());
        assert_eq!(candidates[2].start_mileage, 10);
    }

    #[test]
    fn test_non_increasing_readings_are_discarded() {
        let text = "1/1/2025 500 500\n1/2/2025 600 550\nodometer 700 650";
        let result = TripExtractor::new().parse(text, today());

        assert_eq!(result.rejected, 3);
        assert!(result.fallback_used);
        assert_eq!(result.candidates.len(), 1);
        assert!(result.candidates.iter().all(|c| c.end_mileage > c.start_mileage));
    }

    #[test]
    fn test_zero_start_reading_is_accepted() {
        let candidates = TripExtractor::new().extract("Start: 0 End: 12", today());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].start_mileage, 0);
        assert_eq!(candidates[0].source, CandidateSource::StartEnd);
    }

    #[test]
    fn test_multiple_matches_per_rule_kept_in_text_order() {
        let text = "1/3/25 100 120\n1/4/25 120 180\n1/5/25 180 181";
        let candidates = TripExtractor::new().extract(text, today());

        let days: Vec<String> = candidates.iter().map(|c| c.date.to_string()).collect();
        assert_eq!(days, vec!["2025-01-03", "2025-01-04", "2025-01-05"]);
    }

    #[test]
    fn test_custom_rule_list() {
        let extractor = TripExtractor::with_rules(vec![Box::new(crate::extract::rules::OdometerRule)]);
        let candidates = extractor.extract("1/3/25 100 120", today());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, CandidateSource::Fallback);
    }
}
