//! Infrastructure layer for scraping, parsing, and persistence
//!
//! Page-session abstraction and its HTTP-backed implementation, the
//! multi-strategy candidate collector, the promotion text parser, the
//! JSON snapshot store, and the ambient concerns (config, logging, HTTP).

pub mod collector;
pub mod config;
pub mod http_client;
pub mod http_session;
pub mod logging;
pub mod parsing;
pub mod session;
pub mod store;

// Re-export commonly used items
pub use collector::{CandidateCollector, CollectorConfig};
pub use config::AppConfig;
pub use http_client::HttpClient;
pub use http_session::{HttpPageSession, HttpSessionProvider};
pub use parsing::{ParseError, ParseReport, parse_candidates};
pub use session::{ElementCapture, PageSession, SessionError, SessionProvider};
pub use store::{HistoryEntry, SnapshotStore, StorageError};
