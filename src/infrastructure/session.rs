//! Page automation session abstraction
//!
//! The collector never talks to a browser directly. It borrows a
//! `PageSession` for one run, drives it through navigation and synthetic
//! input, and reads back plain structured captures produced by in-page
//! evaluation. Keeping the session behind a trait lets tests run the full
//! collector against an in-memory fake, and keeps the one live session per
//! run scoped instead of ambient.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by the page automation collaborator.
///
/// All of these are recoverable at pipeline level: a failed session yields
/// an empty candidate list for the cycle, never a crash.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    #[error("Session could not be established: {message}")]
    Establish { message: String },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Page operation timed out: {message}")]
    Timeout { message: String },

    #[error("Execution context was destroyed mid-run: {message}")]
    ContextDestroyed { message: String },

    #[error("In-page evaluation failed: {message}")]
    Evaluate { message: String },

    #[error("Synthetic input failed: {message}")]
    Input { message: String },
}

/// Plain structured data returned by in-page evaluation: the observable
/// output of one DOM element, detached from any node reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementCapture {
    /// Heading text found inside the element, when present.
    pub title: Option<String>,
    /// Full visible text content of the element.
    pub text: String,
    /// Alt text of a contained image (banners are often image-only).
    pub alt_text: String,
    /// Resolved absolute link, empty when the element links nowhere.
    pub link: String,
}

impl ElementCapture {
    /// Combined text used for keyword matching: heading, body text, and
    /// image alt text in one haystack.
    pub fn full_text(&self) -> String {
        let title = self.title.as_deref().unwrap_or("");
        let joined = format!("{} {} {}", title, self.text, self.alt_text);
        joined.trim().to_string()
    }

    /// Best available display title: heading, then alt text, then the
    /// leading slice of the body text.
    pub fn display_title(&self) -> String {
        if let Some(title) = self.title.as_deref() {
            if !title.trim().is_empty() {
                return title.trim().to_string();
            }
        }
        if !self.alt_text.trim().is_empty() {
            return self.alt_text.trim().to_string();
        }
        self.text.trim().chars().take(100).collect::<String>().trim().to_string()
    }
}

/// One live page-automation session, owned by the collector for the
/// duration of a single run and closed on every exit path.
///
/// The contract mirrors what the automation collaborator exposes:
/// navigation, in-page evaluation returning plain data, computed-visibility
/// reads (folded into `scan_visible_banners`), and synthetic input.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Navigate to the given URL and wait for the page to settle.
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Open the site search and submit the given query.
    async fn submit_search(&self, query: &str) -> Result<(), SessionError>;

    /// Open a site navigation section by its visible label.
    async fn open_section(&self, label: &str) -> Result<(), SessionError>;

    /// Capture all interactive/card-like elements of the current view
    /// (search results scan).
    async fn scan_cards(&self) -> Result<Vec<ElementCapture>, SessionError>;

    /// Capture all anchor elements of the current view (menu scan).
    async fn scan_links(&self) -> Result<Vec<ElementCapture>, SessionError>;

    /// Capture carousel slides and banner-like elements that are
    /// *currently visible* (computed display/visibility/opacity, not mere
    /// DOM presence).
    async fn scan_visible_banners(&self) -> Result<Vec<ElementCapture>, SessionError>;

    /// Move the pointer to a neutral corner so hover does not pause the
    /// carousel auto-rotation.
    async fn park_pointer(&self) -> Result<(), SessionError>;

    /// Release the session. Idempotent; called on every exit path.
    async fn close(&self);
}

/// Acquires a fresh session per pipeline run, so no live page state is
/// ever shared across runs.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: PageSession;

    async fn acquire(&self) -> Result<Self::Session, SessionError>;
}
