//! quote-poller entry point.
//!
//! Resolves the quote endpoint, initialises structured logging, and runs
//! the poll loop until its lifetime elapses. A fatal HTTP status from the
//! quote API ends the process with a non-zero exit code.

use anyhow::Result;
use std::io;
use tracing::{error, info};

use quote_poller::config::{self, DEFAULT_ENDPOINT};
use quote_poller::poller::Poller;
use quote_poller::source::HttpQuoteSource;
use quote_poller::types::Schedule;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let endpoint = config::load_endpoint(DEFAULT_ENDPOINT);

    let source = HttpQuoteSource::new(endpoint)?;
    let mut poller = Poller::new(source, Schedule::default(), io::stdout());

    match poller.run().await {
        Ok(report) => {
            info!(
                fetches = report.fetches,
                printed = report.printed,
                "quote-poller finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Aborting on fatal quote API response");
            std::process::exit(1);
        }
    }
}

/// Initialise the `tracing` subscriber. Logs go to stderr so stdout
/// carries only quotes.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quote_poller=info"));

    let json_logging = std::env::var("QUOTE_POLLER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    }
}
