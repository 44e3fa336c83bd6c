// Periodic persistence backstop

use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Fixed-interval timer driven by caller-supplied ticks
#[derive(Debug, Clone)]
pub struct Autosave {
    interval: Duration,
    last_run: Instant,
}

impl Autosave {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_run: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True once per elapsed interval; restarts the interval when it fires
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_run) < self.interval {
            return false;
        }
        self.last_run = now;
        true
    }
}
