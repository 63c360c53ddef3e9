//! Multi-strategy promotion candidate collector
//!
//! Runs three independent extraction strategies against one page session:
//! search-driven scanning, menu navigation, and timed sampling of the
//! auto-rotating homepage carousel. Strategies run strictly sequentially
//! because they share mutable page state (navigation, scroll, hover); a
//! failing strategy is logged and contributes nothing, the others still
//! run. If the page session itself cannot be established the collector
//! yields an empty list - "no data this cycle" is recoverable.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::parsing::patterns;
use super::session::{PageSession, SessionError};
use crate::domain::promotion::RawCandidate;

/// Production defaults, shared with the configuration layer so the two
/// never drift.
pub const DEFAULT_BASE_URL: &str = "https://www.livelo.com.br";
pub const DEFAULT_SEARCH_QUERY: &str = "transferir pontos companhias aereas";
pub const DEFAULT_MENU_SECTION: &str = "Viagens";

/// Collector tuning. Carousel window/interval are configuration rather
/// than constants so tests can run the full sampling loop in milliseconds.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Page the session is pointed at before any strategy runs.
    pub base_url: String,
    /// Query submitted by the search strategy.
    pub search_query: String,
    /// Navigation section label opened by the menu strategy.
    pub menu_section: String,
    /// Wall-clock budget for carousel sampling.
    pub carousel_window: Duration,
    /// Pause between carousel samples.
    pub carousel_interval: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_query: DEFAULT_SEARCH_QUERY.to_string(),
            menu_section: DEFAULT_MENU_SECTION.to_string(),
            // The carousel rotates every ~5s across ~5-10 slides; one
            // minute of sampling covers a full cycle.
            carousel_window: Duration::from_secs(60),
            carousel_interval: Duration::from_secs(4),
        }
    }
}

/// Gathers deduplicated promotion candidates from a single page session.
pub struct CandidateCollector {
    config: CollectorConfig,
}

impl CandidateCollector {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// Run all strategies against `session` and merge their output.
    ///
    /// The session is closed on every exit path. The result may
    /// legitimately be empty: navigation failure, or simply no promotion
    /// content on the page.
    pub async fn collect(
        &self,
        session: &dyn PageSession,
        cancel: &CancellationToken,
    ) -> Vec<RawCandidate> {
        info!("Navigating to {}...", self.config.base_url);

        if let Err(e) = session.navigate(&self.config.base_url).await {
            match &e {
                SessionError::ContextDestroyed { .. } => {
                    warn!("Page navigation interrupted scraping - this is normal, will retry next time");
                }
                SessionError::Timeout { .. } => {
                    warn!("Page took too long to load - will retry next time");
                }
                other => error!("Error establishing page session: {}", other),
            }
            session.close().await;
            return Vec::new();
        }

        let mut all: Vec<RawCandidate> = Vec::new();

        match self.collect_from_search(session).await {
            Ok(found) => {
                info!("Found {} candidates from search", found.len());
                all.extend(found);
            }
            Err(e) => warn!("Search scraping failed: {}", e),
        }

        match self.collect_from_menu(session).await {
            Ok(found) => {
                info!("Found {} candidates from menu", found.len());
                all.extend(found);
            }
            Err(e) => warn!("Menu scraping failed: {}", e),
        }

        let banner_found = self.collect_from_banners(session, cancel).await;
        info!("Found {} unique candidates from banners", banner_found.len());
        all.extend(banner_found);

        session.close().await;

        let merged = dedup_by_title(all);
        info!("Collected {} unique candidates in total", merged.len());
        merged
    }

    /// Strategy 1: submit the transfer search query, then scan all
    /// card-like elements of the results for partner/bonus keywords.
    async fn collect_from_search(
        &self,
        session: &dyn PageSession,
    ) -> Result<Vec<RawCandidate>, SessionError> {
        info!("Attempting to scrape from search...");

        session.submit_search(&self.config.search_query).await?;

        let captures = session.scan_cards().await?;
        let candidates = captures
            .iter()
            .filter(|capture| patterns::CONTENT_KEYWORDS.is_match(&capture.text))
            .map(|capture| {
                RawCandidate::new(
                    capture.display_title(),
                    capture.text.trim(),
                    capture.link.clone(),
                )
            })
            .collect();
        Ok(candidates)
    }

    /// Strategy 2: open the travel section and scan anchors whose text
    /// mentions point transfers or partner airlines.
    async fn collect_from_menu(
        &self,
        session: &dyn PageSession,
    ) -> Result<Vec<RawCandidate>, SessionError> {
        info!("Attempting to scrape from menu...");

        session.open_section(&self.config.menu_section).await?;

        let captures = session.scan_links().await?;
        let candidates = captures
            .iter()
            .filter(|capture| patterns::MENU_LINK_KEYWORDS.is_match(&capture.text))
            .map(|capture| {
                let text = capture.text.trim();
                RawCandidate::new(text, text, capture.link.clone())
            })
            .collect();
        Ok(candidates)
    }

    /// Strategy 3: sample the auto-rotating carousel over a fixed window.
    ///
    /// A single read only sees the currently-visible slide, so the loop
    /// re-reads the visible banner set every interval and merges into a
    /// running set keyed by `(title, link)`. The pointer is parked first
    /// so hover does not pause the rotation. Errors mid-loop keep whatever
    /// was accumulated so far.
    async fn collect_from_banners(
        &self,
        session: &dyn PageSession,
        cancel: &CancellationToken,
    ) -> Vec<RawCandidate> {
        info!(
            "Scraping promotion banners (sampling for {:?}, every {:?})...",
            self.config.carousel_window, self.config.carousel_interval
        );

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut accumulated: Vec<RawCandidate> = Vec::new();

        if let Err(e) = session.park_pointer().await {
            warn!("Error extracting banners: {}", e);
            return accumulated;
        }

        let started = tokio::time::Instant::now();
        loop {
            let captures = match session.scan_visible_banners().await {
                Ok(captures) => captures,
                Err(e) => {
                    warn!("Error extracting banners: {}", e);
                    return accumulated;
                }
            };

            for capture in &captures {
                let full_text = capture.full_text();
                if !patterns::BANNER_KEYWORDS.is_match(&full_text) {
                    continue;
                }
                let candidate =
                    RawCandidate::new(capture.display_title(), full_text, capture.link.clone());
                let key = (candidate.title.clone(), candidate.link.clone());
                if seen.insert(key) {
                    accumulated.push(candidate);
                }
            }

            if started.elapsed() >= self.config.carousel_window {
                break;
            }
            tokio::select! {
                () = tokio::time::sleep(self.config.carousel_interval) => {}
                () = cancel.cancelled() => {
                    info!("Banner sampling cancelled before window elapsed");
                    break;
                }
            }
        }

        accumulated
    }
}

/// Final merge: union of all strategies deduplicated by title alone,
/// last write wins, first-seen order preserved.
fn dedup_by_title(candidates: Vec<RawCandidate>) -> Vec<RawCandidate> {
    let mut order: Vec<String> = Vec::new();
    let mut by_title: HashMap<String, RawCandidate> = HashMap::new();

    for candidate in candidates {
        if !by_title.contains_key(&candidate.title) {
            order.push(candidate.title.clone());
        }
        by_title.insert(candidate.title.clone(), candidate);
    }

    order
        .iter()
        .filter_map(|title| by_title.remove(title))
        .collect()
}
