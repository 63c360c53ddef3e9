//! Shared test doubles for pipeline integration tests

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use livelo_tracker::infrastructure::collector::CollectorConfig;
use livelo_tracker::infrastructure::session::{
    ElementCapture, PageSession, SessionError, SessionProvider,
};

pub fn banner(title: &str, text: &str, link: &str) -> ElementCapture {
    ElementCapture {
        title: Some(title.to_string()),
        text: text.to_string(),
        alt_text: String::new(),
        link: link.to_string(),
    }
}

/// Collector tuning with a millisecond carousel window so tests run the
/// real sampling loop without wall-clock cost.
pub fn fast_collector_config() -> CollectorConfig {
    CollectorConfig {
        carousel_window: Duration::from_millis(5),
        carousel_interval: Duration::from_millis(5),
        ..CollectorConfig::default()
    }
}

/// Fake page session serving a fixed banner set; search and menu scans
/// come back empty, navigation optionally fails.
#[derive(Default)]
pub struct FakeSession {
    pub navigate_error: Option<SessionError>,
    pub banners: Vec<ElementCapture>,
    pub closed: Mutex<bool>,
}

#[async_trait]
impl PageSession for FakeSession {
    async fn navigate(&self, _url: &str) -> Result<(), SessionError> {
        match &self.navigate_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn submit_search(&self, _query: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn open_section(&self, _label: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn scan_cards(&self) -> Result<Vec<ElementCapture>, SessionError> {
        Ok(Vec::new())
    }

    async fn scan_links(&self) -> Result<Vec<ElementCapture>, SessionError> {
        Ok(Vec::new())
    }

    async fn scan_visible_banners(&self) -> Result<Vec<ElementCapture>, SessionError> {
        Ok(self.banners.clone())
    }

    async fn park_pointer(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn close(&self) {
        *self.closed.lock().unwrap() = true;
    }
}

/// Provider vending scripted sessions, one per cycle, in order.
pub struct FakeProvider {
    sessions: Mutex<Vec<FakeSession>>,
}

impl FakeProvider {
    pub fn new(sessions: Vec<FakeSession>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
        }
    }
}

#[async_trait]
impl SessionProvider for FakeProvider {
    type Session = FakeSession;

    async fn acquire(&self) -> Result<FakeSession, SessionError> {
        let mut guard = self.sessions.lock().unwrap();
        if guard.is_empty() {
            Err(SessionError::Establish {
                message: "no scripted session left".to_string(),
            })
        } else {
            Ok(guard.remove(0))
        }
    }
}
