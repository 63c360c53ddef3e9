//! Livelo Tracker - Loyalty-Point Transfer Bonus Promotion Watcher
//!
//! Watches the Livelo promotions page for point-transfer bonus offers,
//! turns the noisy page content into typed records, and classifies which
//! offers are new, expired, or updated since the last observation so a
//! notification collaborator can alert subscribers.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the pipeline surface for embedding callers
pub use application::{CycleOutcome, PromotionPipeline};
pub use domain::{Airline, ChangeSet, Promotion, RawCandidate};
