//! Domain module - Core business logic and entities
//!
//! Typed promotion records, snapshot change classification, and validity
//! rules. Everything here is pure and synchronous; the infrastructure
//! layer owns scraping, parsing machinery, and persistence.

pub mod changes;
pub mod promotion;

// Re-export commonly used items
pub use changes::{ChangeSet, detect_changes};
pub use promotion::{Airline, Promotion, RawCandidate, filter_valid};
