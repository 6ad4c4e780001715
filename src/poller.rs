//! The poll loop controller.
//!
//! Performs one fetch immediately, then one per schedule interval, and
//! stops once the schedule lifetime has elapsed. Fetches run inline on the
//! loop, so a slow request delays the next tick rather than overlapping it.

use std::io::Write;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::source::QuoteSource;
use crate::types::{PollReport, PollState, Quote, QuoteError, Schedule};

/// Drives a `QuoteSource` on a `Schedule`, writing one line per quote to `out`.
pub struct Poller<S, W> {
    source: S,
    schedule: Schedule,
    out: W,
    state: PollState,
    report: PollReport,
}

impl<S: QuoteSource, W: Write> Poller<S, W> {
    pub fn new(source: S, schedule: Schedule, out: W) -> Self {
        Self {
            source,
            schedule,
            out,
            state: PollState::Initial,
            report: PollReport::default(),
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn report(&self) -> &PollReport {
        &self.report
    }

    /// Consume the poller and hand back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until the lifetime elapses.
    ///
    /// Returns `Err` for a fatal fetch error (HTTP status above 399). A
    /// poller runs once: calling `run` again after it has terminated
    /// returns `QuoteError::Terminated`. Both timers are dropped on return.
    pub async fn run(&mut self) -> Result<PollReport, QuoteError> {
        if self.state == PollState::Terminated {
            return Err(QuoteError::Terminated);
        }

        info!(
            source = %self.source.describe(),
            interval_ms = self.schedule.interval().as_millis() as u64,
            lifetime_ms = self.schedule.lifetime().as_millis() as u64,
            "Starting poll loop"
        );

        self.fetch_and_print().await?;
        debug!("Initial fetch completed");
        self.state = PollState::Waiting;

        let mut ticker = time::interval_at(
            Instant::now() + self.schedule.interval(),
            self.schedule.interval(),
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let lifetime = time::sleep(self.schedule.lifetime());
        tokio::pin!(lifetime);

        loop {
            tokio::select! {
                biased;

                _ = &mut lifetime => {
                    self.state = PollState::Terminated;
                    info!(
                        state = %self.state,
                        fetches = self.report.fetches,
                        printed = self.report.printed,
                        "{:?} have passed, stopping the loop",
                        self.schedule.lifetime()
                    );
                    return Ok(self.report.clone());
                }
                _ = ticker.tick() => {
                    self.fetch_and_print().await?;
                    debug!(fetches = self.report.fetches, "Scheduled fetch completed");
                }
            }
        }
    }

    /// Fetch once and print the first quote.
    ///
    /// Recoverable errors are logged and yield `Ok(None)`. A fatal error
    /// terminates the loop and is returned.
    pub async fn fetch_and_print(&mut self) -> Result<Option<Quote>, QuoteError> {
        self.report.fetches += 1;

        let quotes = match self.source.fetch_quotes().await {
            Ok(q) => q,
            Err(e) if e.is_fatal() => {
                error!(error = %e, "Fatal response from quote API");
                self.state = PollState::Terminated;
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, "Fetch failed, skipping this cycle");
                return Ok(None);
            }
        };

        let Some(quote) = quotes.into_iter().next() else {
            warn!("Quote API returned an empty list, skipping this cycle");
            return Ok(None);
        };

        match writeln!(self.out, "{quote}").and_then(|_| self.out.flush()) {
            Ok(()) => self.report.printed += 1,
            Err(e) => warn!(error = %e, "Failed to write quote"),
        }

        Ok(Some(quote))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
