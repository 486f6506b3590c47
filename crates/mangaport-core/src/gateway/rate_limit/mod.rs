//! Fixed-window admission gate for the page-server endpoint.
//!
//! Known properties:
//! - Not FIFO. Whichever waiter wakes first takes the next permit.
//! - Fixed-window edge effect: up to `2 × limit` grants can straddle a window
//!   boundary. Kept as-is; this is a courtesy limiter, not a quota guarantee.
//! - State is per process and starts empty on boot. Several processes sharing
//!   one upstream quota are not coordinated.
//! - Dropping an `acquire()` future mid-wait records nothing.

mod clock;


pub use clock::{Clock, ManualClock, TokioClock};

use mangaport_types::{GatewayError, PageLimitConfig};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of a single admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Granted,
    /// Suspend this long, then re-check.
    Wait(Duration),
}

pub struct FixedWindowLimiter<C: Clock = TokioClock> {
    limit: usize,
    window: Duration,
    buffer: Duration,
    max_wait: Option<Duration>,
    granted: Mutex<VecDeque<Instant>>,
    clock: C,
}

impl FixedWindowLimiter<TokioClock> {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self::with_clock(limit, window, TokioClock)
    }

    pub fn from_config(config: &PageLimitConfig) -> Self {
        Self::from_config_with_clock(config, TokioClock)
    }
}

impl<C: Clock> FixedWindowLimiter<C> {
    pub fn with_clock(limit: u32, window: Duration, clock: C) -> Self {
        Self {
            limit: limit.max(1) as usize,
            window,
            buffer: Duration::from_millis(mangaport_types::models::config::default_buffer_ms()),
            max_wait: None,
            granted: Mutex::new(VecDeque::with_capacity(limit as usize)),
            clock,
        }
    }

    pub fn from_config_with_clock(config: &PageLimitConfig, clock: C) -> Self {
        Self::with_clock(config.limit, Duration::from_millis(config.window_ms), clock)
            .buffer(Duration::from_millis(config.buffer_ms))
            .max_wait(config.max_wait_ms.map(Duration::from_millis))
    }

    /// Slack added to each computed wait.
    pub fn buffer(mut self, buffer: Duration) -> Self {
        self.buffer = buffer;
        self
    }

    /// Give up with `RateLimitTimeout` once total waiting would pass `max_wait`.
    pub fn max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Evict, check and record in one critical section.
    pub fn try_admit(&self) -> Admission {
        let now = self.clock.now();
        let mut granted = self.granted.lock();

        while let Some(&oldest) = granted.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                granted.pop_front();
            } else {
                break;
            }
        }

        if granted.len() < self.limit {
            granted.push_back(now);
            return Admission::Granted;
        }

        let elapsed = granted.front().map_or(Duration::ZERO, |&oldest| now.saturating_duration_since(oldest));
        Admission::Wait(self.window.saturating_sub(elapsed) + self.buffer)
    }

    /// Wait for a permit. The lock is never held across the sleep.
    pub async fn acquire(&self) -> Result<(), GatewayError> {
        let mut waited = Duration::ZERO;

        loop {
            match self.try_admit() {
                Admission::Granted => {
                    if !waited.is_zero() {
                        tracing::debug!("Page-server permit granted after {}ms", waited.as_millis());
                    }
                    return Ok(());
                },
                Admission::Wait(wait) => {
                    if let Some(max_wait) = self.max_wait {
                        if waited + wait > max_wait {
                            tracing::warn!(
                                "Page-server limiter gave up after {}ms (next wait {}ms, cutoff {}ms)",
                                waited.as_millis(),
                                wait.as_millis(),
                                max_wait.as_millis()
                            );
                            return Err(GatewayError::RateLimitTimeout {
                                waited_ms: waited.as_millis() as u64,
                            });
                        }
                    }
                    tracing::debug!(
                        "Page-server window full ({}/{}), waiting {}ms",
                        self.limit,
                        self.limit,
                        wait.as_millis()
                    );
                    self.clock.sleep(wait).await;
                    waited += wait;
                },
            }
        }
    }

    /// Grants still inside the window at this instant.
    pub fn in_flight_window(&self) -> usize {
        let now = self.clock.now();
        self.granted
            .lock()
            .iter()
            .filter(|&&at| now.saturating_duration_since(at) < self.window)
            .count()
    }
}
