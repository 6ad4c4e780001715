//! Shared types for the quote poller.
//!
//! The quote record parsed from the remote API, the polling schedule,
//! and the error taxonomy of a single fetch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// One element of the quote API's JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote: String,
    pub character: String,
    /// Not printed.
    #[serde(default)]
    pub image: Option<String>,
    /// Not printed.
    #[serde(default)]
    pub character_direction: Option<String>,
}

impl Quote {
    pub fn new(quote: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            character: character.into(),
            image: None,
            character_direction: None,
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.quote, self.character)
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(100);

/// Shortest accepted tick interval. `tokio::time::interval` rejects zero.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Tick interval and total lifetime of a polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    interval: Duration,
    lifetime: Duration,
}

impl Schedule {
    /// An interval below `MIN_INTERVAL` is raised to it.
    pub fn new(interval: Duration, lifetime: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            lifetime,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, DEFAULT_LIFETIME)
    }
}

// ---------------------------------------------------------------------------
// Controller state
// ---------------------------------------------------------------------------

/// Lifecycle of the poll loop. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Initial,
    Waiting,
    Terminated,
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollState::Initial => write!(f, "INITIAL"),
            PollState::Waiting => write!(f, "WAITING"),
            PollState::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Fetch attempts, including the initial one.
    pub fetches: u32,
    /// Lines written to the output.
    pub printed: u32,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failure of a single fetch. Only `Status` is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("error querying API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected response {status} - {reason}")]
    Status { status: u16, reason: String },

    #[error("error reading response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("error reading quotes API - {0}")]
    Parse(#[from] serde_json::Error),

    #[error("poll loop already terminated")]
    Terminated,
}

impl QuoteError {
    /// Whether this error should stop the whole process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, QuoteError::Status { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
