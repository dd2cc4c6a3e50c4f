//! Misc utilities.

use crate::common::*;

/// Counts events and reports a throughput once per interval.
#[derive(Debug)]
pub struct RateCounter {
    interval: Duration,
    count: f64,
    begin: Instant,
}

impl RateCounter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            count: 0.0,
            begin: Instant::now(),
        }
    }

    pub fn with_second_interval() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn add(&mut self, count: f64) {
        self.count += count;
    }

    /// The rate since the last report, or `None` until a full interval
    /// has elapsed. Reporting resets the window.
    pub fn rate(&mut self) -> Option<f64> {
        let elapsed = self.begin.elapsed();
        if elapsed < self.interval {
            return None;
        }
        let rate = self.count / elapsed.as_secs_f64();
        self.count = 0.0;
        self.begin = Instant::now();
        Some(rate)
    }
}
