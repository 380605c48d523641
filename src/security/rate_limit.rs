//! Fixed-window admission control.
//!
//! The counter resets at discrete window boundaries. This is deliberately
//! not a sliding window: a burst straddling a boundary can see up to
//! `2 × limit` admissions in a short span.

use std::sync::Mutex;
use std::time::Duration;
use serde::Serialize;
use tokio::time::Instant;

use crate::config::RateLimitConfig;

/// Mutable window state, only touched under the admitter's lock.
#[derive(Debug)]
struct RateWindow {
    count: u32,
    window_start: Instant,
}

impl RateWindow {
    fn new(now: Instant) -> Self {
        Self {
            count: 0,
            window_start: now,
        }
    }

    /// Reset to a fresh window if the current one has expired.
    fn roll(&mut self, now: Instant, window: Duration) {
        if now.duration_since(self.window_start) >= window {
            self.count = 0;
            self.window_start = now;
        }
    }
}

/// Snapshot of the admitter, taken under a single rollover check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateStatus {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_time_ms: u64,
    pub limit: u32,
    pub window_ms: u64,
}

/// Process-wide request budget shared by every module of one client.
#[derive(Debug)]
pub struct RateAdmitter {
    limit: u32,
    window: Duration,
    state: Mutex<RateWindow>,
}

impl RateAdmitter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Mutex::new(RateWindow::new(Instant::now())),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.limit, Duration::from_millis(config.window_ms))
    }

    fn with_window<R>(&self, f: impl FnOnce(&mut RateWindow, Instant) -> R) -> R {
        let now = Instant::now();
        let mut window = self.state.lock().expect("rate limiter mutex poisoned");
        window.roll(now, self.window);
        f(&mut window, now)
    }

    /// True iff the current window still has capacity.
    pub fn check_limit(&self) -> bool {
        self.with_window(|w, _| w.count < self.limit)
    }

    /// Count one admission against the current window.
    ///
    /// Recording never blocks; the count may exceed the limit.
    pub fn record_request(&self) {
        self.with_window(|w, _| w.count = w.count.saturating_add(1));
    }

    /// Check and record in one step, for callers on real OS threads.
    pub fn try_acquire(&self) -> bool {
        self.with_window(|w, _| {
            if w.count < self.limit {
                w.count += 1;
                true
            } else {
                false
            }
        })
    }

    pub fn get_remaining(&self) -> u32 {
        self.with_window(|w, _| self.limit.saturating_sub(w.count))
    }

    /// Time until the current window boundary.
    pub fn get_reset_time(&self) -> Duration {
        self.with_window(|w, now| self.time_to_boundary(w, now))
    }

    /// Start a fresh, full window now.
    pub fn reset(&self) {
        let now = Instant::now();
        let mut window = self.state.lock().expect("rate limiter mutex poisoned");
        *window = RateWindow::new(now);
    }

    pub fn get_status(&self) -> RateStatus {
        self.with_window(|w, now| RateStatus {
            allowed: w.count < self.limit,
            remaining: self.limit.saturating_sub(w.count),
            reset_time_ms: self.time_to_boundary(w, now).as_millis() as u64,
            limit: self.limit,
            window_ms: self.window.as_millis() as u64,
        })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn time_to_boundary(&self, w: &RateWindow, now: Instant) -> Duration {
        (w.window_start + self.window).saturating_duration_since(now)
    }
}

impl Default for RateAdmitter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
