//! Static-HTML implementation of the page session contract
//!
//! Stands in for the browser-automation collaborator using plain HTTP
//! fetches and server-rendered markup. Degraded by design: script-driven
//! carousel rotation cannot be observed between fetches, so repeated
//! banner samples may keep seeing the same server-rendered slide set, and
//! pointer parking is a no-op. Visibility is approximated from inline
//! style attributes since no computed style exists without a renderer.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use super::config::ScrapingConfig;
use super::http_client::HttpClient;
use super::session::{ElementCapture, PageSession, SessionError, SessionProvider};

static CARD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a, .card, .promotion, .offer, [class*="promo"]"#).expect("valid card selector")
});
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("valid anchor selector"));
static BANNER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#".banner, .promo, .promotion, .offer, .campaign, [class*="banner"], [class*="promo"], [class*="destaque"], [class*="slide"]"#,
    )
    .expect("valid banner selector")
});
static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"h1, h2, h3, h4, .title, [class*="title"]"#).expect("valid heading selector"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid img selector"));

#[derive(Default)]
struct PageState {
    html: Option<String>,
    url: Option<Url>,
}

/// Page session backed by the rate-limited HTTP client.
pub struct HttpPageSession {
    http: HttpClient,
    state: Mutex<PageState>,
}

impl HttpPageSession {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            state: Mutex::new(PageState::default()),
        }
    }

    async fn fetch_into_state(&self, url: Url) -> Result<(), SessionError> {
        let html = self
            .http
            .get_text(url.as_str())
            .await
            .map_err(|e| classify_fetch_error(url.as_str(), &e))?;

        let mut state = self.state.lock().await;
        state.html = Some(html);
        state.url = Some(url);
        Ok(())
    }

    async fn with_document<T>(
        &self,
        scan: impl FnOnce(&Html, Option<&Url>) -> T,
    ) -> Result<T, SessionError> {
        let state = self.state.lock().await;
        let html = state.html.as_deref().ok_or_else(|| SessionError::Evaluate {
            message: "No page loaded".to_string(),
        })?;
        let document = Html::parse_document(html);
        Ok(scan(&document, state.url.as_ref()))
    }
}

#[async_trait]
impl PageSession for HttpPageSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let parsed = Url::parse(url).map_err(|e| SessionError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        self.fetch_into_state(parsed).await
    }

    async fn submit_search(&self, query: &str) -> Result<(), SessionError> {
        let base = {
            let state = self.state.lock().await;
            state.url.clone().ok_or_else(|| SessionError::Input {
                message: "Cannot search before navigation".to_string(),
            })?
        };
        let mut search_url = base.join("/busca").map_err(|e| SessionError::Input {
            message: format!("Cannot build search URL: {e}"),
        })?;
        search_url.query_pairs_mut().append_pair("q", query);

        debug!("Submitting search: {}", search_url);
        self.fetch_into_state(search_url).await
    }

    async fn open_section(&self, label: &str) -> Result<(), SessionError> {
        let target = self
            .with_document(|document, base| {
                let needle = label.to_lowercase();
                document
                    .select(&ANCHOR_SELECTOR)
                    .find(|anchor| element_text(*anchor).to_lowercase().contains(&needle))
                    .and_then(|anchor| anchor.value().attr("href"))
                    .and_then(|href| resolve_link(href, base))
            })
            .await?;

        match target {
            Some(url) => {
                debug!("Opening section '{}' at {}", label, url);
                self.fetch_into_state(url).await
            }
            None => Err(SessionError::Input {
                message: format!("Navigation section '{label}' not found"),
            }),
        }
    }

    async fn scan_cards(&self) -> Result<Vec<ElementCapture>, SessionError> {
        self.with_document(|document, base| {
            document
                .select(&CARD_SELECTOR)
                .map(|element| capture_element(element, base))
                .collect()
        })
        .await
    }

    async fn scan_links(&self) -> Result<Vec<ElementCapture>, SessionError> {
        self.with_document(|document, base| {
            document
                .select(&ANCHOR_SELECTOR)
                .map(|element| capture_element(element, base))
                .collect()
        })
        .await
    }

    async fn scan_visible_banners(&self) -> Result<Vec<ElementCapture>, SessionError> {
        self.with_document(|document, base| {
            document
                .select(&BANNER_SELECTOR)
                .filter(|element| is_visible(*element))
                .map(|element| capture_element(element, base))
                .collect()
        })
        .await
    }

    async fn park_pointer(&self) -> Result<(), SessionError> {
        // No pointer exists in a static fetch; hover cannot pause anything.
        Ok(())
    }

    async fn close(&self) {
        let mut state = self.state.lock().await;
        *state = PageState::default();
    }
}

/// Builds one fresh HTTP-backed session per pipeline run.
pub struct HttpSessionProvider {
    config: ScrapingConfig,
}

impl HttpSessionProvider {
    pub fn new(config: ScrapingConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    type Session = HttpPageSession;

    async fn acquire(&self) -> Result<HttpPageSession, SessionError> {
        let http = HttpClient::new(&self.config).map_err(|e| SessionError::Establish {
            message: format!("{e:#}"),
        })?;
        Ok(HttpPageSession::new(http))
    }
}

fn classify_fetch_error(url: &str, error: &anyhow::Error) -> SessionError {
    let timed_out = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<reqwest::Error>())
        .any(reqwest::Error::is_timeout);
    if timed_out {
        SessionError::Timeout {
            message: format!("Fetching {url} timed out"),
        }
    } else {
        SessionError::Navigation {
            url: url.to_string(),
            message: format!("{error:#}"),
        }
    }
}

/// Inline-style visibility heuristic. Without a renderer there is no
/// computed style; elements hidden by stylesheets will slip through.
fn is_visible(element: ElementRef<'_>) -> bool {
    if element.value().attr("hidden").is_some() {
        return false;
    }
    let Some(style) = element.value().attr("style") else {
        return true;
    };
    let style = style.replace(' ', "").to_lowercase();
    !(style.contains("display:none")
        || style.contains("visibility:hidden")
        || style.contains("opacity:0;")
        || style.ends_with("opacity:0"))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_link(href: &str, base: Option<&Url>) -> Option<Url> {
    match base {
        Some(base) => base.join(href).ok(),
        None => Url::parse(href).ok(),
    }
}

fn capture_element(element: ElementRef<'_>, base: Option<&Url>) -> ElementCapture {
    let title = element
        .select(&HEADING_SELECTOR)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());

    let alt_text = element
        .select(&IMG_SELECTOR)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .or_else(|| {
            (element.value().name() == "img")
                .then(|| element.value().attr("alt"))
                .flatten()
        })
        .unwrap_or("")
        .to_string();

    let href = element
        .value()
        .attr("href")
        .or_else(|| {
            element
                .select(&ANCHOR_SELECTOR)
                .next()
                .and_then(|anchor| anchor.value().attr("href"))
        })
        .unwrap_or("");
    let link = if href.is_empty() {
        String::new()
    } else {
        resolve_link(href, base)
            .map(|url| url.to_string())
            .unwrap_or_default()
    };

    ElementCapture {
        title,
        text: element_text(element),
        alt_text,
        link,
    }
}
