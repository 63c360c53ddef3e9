//! Application layer - Use cases and application services
//!
//! Coordinates the domain and infrastructure layers into the one workflow
//! this application exists for: the promotion check cycle.

pub mod pipeline;

// Re-export commonly used items
pub use pipeline::{CycleOutcome, PromotionPipeline};
