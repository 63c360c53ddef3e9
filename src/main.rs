//! One-shot promotion check binary
//!
//! Loads configuration, runs a single pipeline cycle against the live
//! page, and logs the resulting change set. Scheduling and outbound
//! notification are external collaborators; this entry point is what they
//! invoke.

use std::path::PathBuf;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use livelo_tracker::application::PromotionPipeline;
use livelo_tracker::infrastructure::collector::CandidateCollector;
use livelo_tracker::infrastructure::config::AppConfig;
use livelo_tracker::infrastructure::http_session::HttpSessionProvider;
use livelo_tracker::infrastructure::logging::init_logging;
use livelo_tracker::infrastructure::store::SnapshotStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("./config.json"), PathBuf::from);

    let config = AppConfig::load_or_default(&config_path).await?;
    init_logging(&config.logging)?;

    info!("Starting Livelo promotion tracker...");

    let cancel = CancellationToken::new();
    let pipeline = PromotionPipeline::new(
        HttpSessionProvider::new(config.scraping.clone()),
        CandidateCollector::new(config.collector_config()),
        SnapshotStore::new(config.storage.data_dir.clone()),
        cancel.clone(),
    );

    // Ctrl+C shortens the carousel sampling window cooperatively.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested, cancelling in-flight sampling...");
            cancel.cancel();
        }
    });

    let outcome = pipeline.run_cycle().await;

    info!(
        "Cycle result: {} active promotions, {} new, {} expired, {} updated \
         ({} unresolved dropped, {} parse failures)",
        outcome.current.len(),
        outcome.changes.new.len(),
        outcome.changes.expired.len(),
        outcome.changes.updated.len(),
        outcome.unresolved_dropped,
        outcome.parse_failures
    );

    for promotion in &outcome.changes.new {
        info!(
            "New promotion: {} - {}% bonus (valid until {})",
            promotion.airline,
            promotion.bonus_percentage.unwrap_or(0),
            promotion
                .valid_until
                .map_or_else(|| "ongoing".to_string(), |d| d.to_string())
        );
    }

    Ok(())
}
