//! Politeness delay between upstream requests.
//!
//! SINAICA is a small public service. Before every request after the first,
//! the client sleeps for a random duration below `max_pause`.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::trace;

/// Random pause between successive requests.
#[derive(Debug)]
pub struct Throttle {
    max_pause: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(max_pause: Duration) -> Self {
        Self {
            max_pause,
            last_request: Mutex::new(None),
        }
    }

    /// Record a request and return how long to wait before sending it.
    ///
    /// The first request goes out immediately.
    pub fn next_pause(&self) -> Duration {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = last.replace(Instant::now());

        let millis = u64::try_from(self.max_pause.as_millis()).unwrap_or(u64::MAX);
        if previous.is_none() || millis == 0 {
            return Duration::ZERO;
        }

        Duration::from_millis(rand::rng().random_range(0..millis))
    }

    /// Sleep for the pause owed before the next request.
    pub async fn wait(&self) {
        let pause = self.next_pause();
        if !pause.is_zero() {
            trace!(pause_ms = pause.as_millis() as u64, "throttling request");
            tokio::time::sleep(pause).await;
        }
    }
}
