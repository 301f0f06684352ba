//! AnalystTrack - a terminal client for tracking analyst stock predictions.
//!
//! The terminal owns stdout, so logs go to a daily-rotated file under the
//! platform data directory.

use analysttrack::{App, Config, config};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let log_dir = config::log_dir().context("locating log directory")?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "analysttrack.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analysttrack=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    // Load configuration
    let config = Config::load_or_default().context("loading configuration")?;
    if !Config::default_path().exists() {
        // First run: write the defaults out so they can be edited.
        if let Err(e) = config.save(None) {
            tracing::warn!("Could not write default config: {}", e);
        }
    }
    tracing::info!(data_file = %config.data_file().display(), "Starting AnalystTrack");

    // Run the application
    let mut app = App::new(config).await.context("starting terminal UI")?;
    app.run().await?;

    tracing::info!("Exiting");
    Ok(())
}
