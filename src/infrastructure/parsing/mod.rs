//! Promotion text parsing infrastructure
//!
//! Regex-as-grammar extraction: a versioned pattern table plus independent
//! pure extractor functions, so the grammar can be tested without any
//! scraping machinery behind it.

pub mod patterns;
pub mod promotion_parser;

// Re-export public types
pub use promotion_parser::{ParseError, ParseReport, parse_candidate, parse_candidates};
