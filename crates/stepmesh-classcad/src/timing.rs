//! Elapsed-time recorder for diagnostic logging.

use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

/// One labelled measurement produced by [`Timing::dump`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingMark {
    /// Label passed to `dump`.
    pub label: String,
    /// Time since the previous mark (or since start for the first one).
    pub since_previous: Duration,
    /// Time since the recorder was started.
    pub total: Duration,
}

/// Timer token. Each [`dump`](Self::dump) logs the time since the previous
/// dump and the cumulative time since [`start`](Self::start).
#[derive(Debug, Clone)]
pub struct Timing {
    started: Instant,
    previous: Instant,
}

impl Timing {
    /// Start a new recorder.
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            previous: now,
        }
    }

    /// Record and log a measurement.
    pub fn dump(&mut self, label: &str) -> TimingMark {
        let now = Instant::now();
        let mark = TimingMark {
            label: label.to_string(),
            since_previous: now.duration_since(self.previous),
            total: now.duration_since(self.started),
        };
        self.previous = now;

        info!(
            label = %mark.label,
            elapsed_ms = mark.since_previous.as_millis() as u64,
            total_ms = mark.total.as_millis() as u64,
            "timing"
        );

        mark
    }
}
