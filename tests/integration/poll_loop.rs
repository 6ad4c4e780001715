//! Poll loop scheduling tests.
//!
//! Run under paused tokio time, so a 10 ms / 100 ms schedule is exact.

use std::time::Duration;
use tokio::time::Instant;

use quote_poller::poller::Poller;
use quote_poller::types::{PollState, Quote, Schedule};

use crate::mock_source::{MockQuoteSource, Outcome};

fn schedule() -> Schedule {
    Schedule::new(Duration::from_millis(10), Duration::from_millis(100))
}

fn homer() -> Quote {
    Quote::new("D'oh!", "Homer Simpson")
}

fn lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_initial_fetch_before_any_tick() {
    // Tick 1 is fatal, so only the initial fetch can print.
    let source = MockQuoteSource::scripted(
        vec![Outcome::Quotes(vec![homer()])],
        Outcome::Status(500),
    );
    let start = Instant::now();
    let mut poller = Poller::new(source.clone(), schedule(), Vec::new());

    assert!(poller.run().await.is_err());

    let calls = source.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0] - start, Duration::ZERO);
    assert_eq!(lines(poller.into_output()), vec!["\"D'oh!\" - Homer Simpson"]);
}

#[tokio::test(start_paused = true)]
async fn test_ten_fetches_over_lifetime() {
    let source = MockQuoteSource::always(homer());
    let start = Instant::now();
    let mut poller = Poller::new(source.clone(), schedule(), Vec::new());

    let report = poller.run().await.unwrap();

    assert_eq!(report.fetches, 10);
    assert_eq!(report.printed, 10);
    assert_eq!(source.call_count(), 10);
    assert_eq!(poller.state(), PollState::Terminated);
    assert!(start.elapsed() >= Duration::from_millis(100));

    let offsets: Vec<u64> = source
        .calls()
        .iter()
        .map(|t| (*t - start).as_millis() as u64)
        .collect();
    assert_eq!(offsets, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);

    let out = lines(poller.into_output());
    assert_eq!(out.len(), 10);
    assert!(out.iter().all(|l| l == "\"D'oh!\" - Homer Simpson"));
}

#[tokio::test(start_paused = true)]
async fn test_bad_status_stops_immediately() {
    let source = MockQuoteSource::scripted(vec![Outcome::Status(500)], Outcome::Quotes(vec![homer()]));
    let start = Instant::now();
    let mut poller = Poller::new(source.clone(), schedule(), Vec::new());

    let err = poller.run().await.unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(source.call_count(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(poller.state(), PollState::Terminated);
    assert!(lines(poller.into_output()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_skips_one_tick() {
    let bart = Quote::new("Eat my shorts.", "Bart Simpson");
    let source = MockQuoteSource::scripted(
        vec![
            Outcome::Quotes(vec![homer()]),
            Outcome::Transport,
            Outcome::Quotes(vec![bart]),
        ],
        Outcome::Transport,
    );
    let mut poller = Poller::new(source.clone(), schedule(), Vec::new());

    let report = tokio_test::assert_ok!(poller.run().await);

    assert_eq!(report.fetches, 10);
    assert_eq!(report.printed, 2);
    assert_eq!(
        lines(poller.into_output()),
        vec!["\"D'oh!\" - Homer Simpson", "\"Eat my shorts.\" - Bart Simpson"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_empty_response_does_not_stop_loop() {
    let source = MockQuoteSource::scripted(vec![Outcome::Quotes(Vec::new())], Outcome::Quotes(vec![homer()]));
    let mut poller = Poller::new(source, schedule(), Vec::new());

    let report = poller.run().await.unwrap();

    assert_eq!(report.fetches, 10);
    assert_eq!(report.printed, 9);
}

#[tokio::test(start_paused = true)]
async fn test_lifetime_shorter_than_interval() {
    let source = MockQuoteSource::always(homer());
    let start = Instant::now();
    let long_interval = Schedule::new(Duration::from_millis(200), Duration::from_millis(100));
    let mut poller = Poller::new(source.clone(), long_interval, Vec::new());

    let report = poller.run().await.unwrap();

    assert_eq!(report.fetches, 1);
    assert_eq!(source.call_count(), 1);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100) && elapsed < Duration::from_millis(200));
}
