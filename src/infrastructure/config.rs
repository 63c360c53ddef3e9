//! Configuration infrastructure
//!
//! Serde-backed application configuration with per-section defaults that
//! mirror the production deployment (Livelo homepage, one-minute carousel
//! budget, `./data` persistence). Loaded from and saved to a JSON file; a
//! missing file yields the defaults and writes them back so the deployed
//! file is always inspectable.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use super::collector::{
    CollectorConfig, DEFAULT_BASE_URL, DEFAULT_MENU_SECTION, DEFAULT_SEARCH_QUERY,
};

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub scraping: ScrapingConfig,
    pub carousel: CarouselConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Page-session and strategy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingConfig {
    /// Promotions page the session is pointed at.
    pub base_url: String,
    /// User agent presented by the HTTP-backed session.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Upper bound on outbound request rate.
    pub max_requests_per_second: u32,
    /// Query submitted by the search strategy.
    pub search_query: String,
    /// Navigation section label opened by the menu strategy.
    pub menu_section: String,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_seconds: 30,
            max_requests_per_second: 2,
            search_query: DEFAULT_SEARCH_QUERY.to_string(),
            menu_section: DEFAULT_MENU_SECTION.to_string(),
        }
    }
}

/// Carousel sampling budget. Milliseconds so tests can shrink the whole
/// window below a single production interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    pub window_ms: u64,
    pub interval_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            interval_ms: 4_000,
        }
    }
}

/// Snapshot store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is not set.
    pub level: String,
    /// Also write daily-rolling log files.
    pub file_output: bool,
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_output: true,
            log_dir: PathBuf::from("./logs"),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults (and
    /// persisting them) when the file does not exist yet.
    pub async fn load_or_default(path: &PathBuf) -> Result<Self> {
        match fs::read_to_string(path).await {
            Ok(contents) => {
                let config: Self = serde_json::from_str(&contents)
                    .with_context(|| format!("Invalid config file: {}", path.display()))?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.save(path).await?;
                info!("Created default configuration at {}", path.display());
                Ok(config)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read config: {}", path.display())),
        }
    }

    /// Persist the configuration as pretty-printed JSON.
    pub async fn save(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Collector tuning derived from the scraping and carousel sections.
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            base_url: self.scraping.base_url.clone(),
            search_query: self.scraping.search_query.clone(),
            menu_section: self.scraping.menu_section.clone(),
            carousel_window: Duration::from_millis(self.carousel.window_ms),
            carousel_interval: Duration::from_millis(self.carousel.interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_config_file_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig::load_or_default(&path).await.unwrap();
        assert_eq!(config.carousel.window_ms, 60_000);
        assert!(path.exists());

        // Round-trips through the file it just wrote.
        let reloaded = AppConfig::load_or_default(&path).await.unwrap();
        assert_eq!(reloaded.scraping.base_url, config.scraping.base_url);
    }

    #[test]
    fn default_scraping_section_matches_collector_defaults() {
        let derived = AppConfig::default().collector_config();
        let standalone = CollectorConfig::default();
        assert_eq!(derived.base_url, standalone.base_url);
        assert_eq!(derived.search_query, standalone.search_query);
        assert_eq!(derived.menu_section, standalone.menu_section);
    }
}
