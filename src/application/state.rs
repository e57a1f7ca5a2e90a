//! # Bot State
//!
//! Run-time state that is not configuration: the scrape watermark with the
//! results of the last completed scrape, and the running flag that gates new
//! work once a stop has been requested.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::domain::types::Listing;

/// Outcome of the most recent completed scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeState {
    pub last_scrape: DateTime<Utc>,
    pub last_results: Vec<Listing>,
}

impl Default for ScrapeState {
    fn default() -> Self {
        Self {
            last_scrape: DateTime::UNIX_EPOCH,
            last_results: Vec::new(),
        }
    }
}

impl ScrapeState {
    /// Replaces the results and advances the watermark. The watermark never
    /// moves backwards, even if an older cycle commits last.
    pub fn commit(&mut self, results: Vec<Listing>, completed_at: DateTime<Utc>) {
        if completed_at > self.last_scrape {
            self.last_scrape = completed_at;
        }
        self.last_results = results;
    }

    pub fn has_scraped(&self) -> bool {
        self.last_scrape > DateTime::UNIX_EPOCH
    }
}

/// `running` flag shared by the dispatcher loop and the scheduler.
#[derive(Debug)]
pub struct RunState {
    running: watch::Sender<bool>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            running: watch::Sender::new(false),
        }
    }
}

impl RunState {
    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    pub fn start(&self) {
        self.running.send_replace(true);
    }

    /// Flips the flag once; work already in flight is left to finish.
    pub fn stop(&self) -> bool {
        self.running.send_replace(false)
    }

    /// Resolves once `stop` has been called.
    pub async fn stopped(&self) {
        let mut rx = self.running.subscribe();
        let _ = rx.wait_for(|running| !running).await;
    }
}
