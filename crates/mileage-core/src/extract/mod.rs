//! Trip extraction from unstructured document text.

mod parser;
pub mod rules;

pub use parser::{
    fallback_candidate, ExtractionResult, TripExtractor, EXTRACTED_LOCATION, EXTRACTED_NOTES,
    FALLBACK_END_MILEAGE, FALLBACK_LOCATION, FALLBACK_NOTES, FALLBACK_START_MILEAGE,
};
