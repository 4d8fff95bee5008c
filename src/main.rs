//! outlier-scan - Windowed outlier detection for stock price CSV files
//!
//! Picks 30 consecutive samples at a random offset and reports every sample
//! more than 2 standard deviations from the window mean.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use outlier_scan::adapters::cli::{self, execute, resolve_config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (OUTLIER_SCAN_OUTPUT_DIR may live there)
    dotenvy::dotenv().ok();

    let app = cli::init();
    let config = resolve_config(app.command.config_path())?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    execute(app.command, &config).await
}

fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new(configured)
    };

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    Ok(())
}
