//! Logging system configuration and initialization
//!
//! Console output always; optional daily-rolling file output under the
//! configured log directory. Filtering honors RUST_LOG and falls back to
//! the configured level. Timestamps are rendered in BRT (UTC-3), the
//! timezone the promotion texts and validity dates are written in.

use anyhow::Result;
use chrono::{FixedOffset, Utc};
use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::config::LoggingConfig;

// Keeps the non-blocking file writer alive for the process lifetime.
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Time formatter for BRT (Brasília time, UTC-3).
struct BrtTimeFormatter;

impl FormatTime for BrtTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let brt_offset = FixedOffset::west_opt(3 * 3600).expect("valid BRT offset");
        let brt_time = Utc::now().with_timezone(&brt_offset);
        write!(w, "{}", brt_time.format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the logging system from configuration.
///
/// Idempotence is the caller's responsibility: call once at startup.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let console_layer = fmt::layer()
        .with_timer(BrtTimeFormatter)
        .with_target(false);

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);

        let file_layer = fmt::layer()
            .with_timer(BrtTimeFormatter)
            .with_ansi(false)
            .with_writer(file_writer);

        Registry::default()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        Registry::default().with(filter).with(console_layer).init();
    }

    Ok(())
}
