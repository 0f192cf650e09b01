//! Circuit breaker for provider rate limiting and bans.
//!
//! Repeated failures (or an outright 403) trip the breaker open; while open,
//! every request is refused until the cooldown elapses. The collector checks
//! availability between units of work and stops scheduling fetches instead
//! of hammering a provider that has started refusing us.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Inner {
    tripped_at: Option<Instant>,
    consecutive_failures: u32,
}

/// Trips open after a run of consecutive failures, or immediately on an
/// explicit ban signal.
#[derive(Debug)]
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    cooldown: Duration,
    trip_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                tripped_at: None,
                consecutive_failures: 0,
            }),
            cooldown,
            trip_threshold: 3,
        }
    }

    /// Default for SwimCloud: 15-minute cooldown, trips after 3 consecutive
    /// failures.
    pub fn default_provider() -> Self {
        Self::new(Duration::from_secs(15 * 60))
    }

    /// Whether a request may go out right now. An expired cooldown closes
    /// the breaker again as a side effect.
    pub fn allows(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.tripped_at {
            None => true,
            Some(at) if at.elapsed() >= self.cooldown => {
                inner.tripped_at = None;
                inner.consecutive_failures = 0;
                true
            }
            Some(_) => false,
        }
    }

    /// A request succeeded; the failure run is over.
    pub fn note_success(&self) {
        self.inner.lock().unwrap().consecutive_failures = 0;
    }

    /// A request failed. Crossing the threshold trips the breaker.
    pub fn note_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.trip_threshold {
            inner.tripped_at = Some(Instant::now());
        }
    }

    /// Trip immediately (403 Forbidden / ban).
    pub fn trip(&self) {
        self.inner.lock().unwrap().tripped_at = Some(Instant::now());
    }

    /// Time left before requests are allowed again; zero when closed.
    pub fn remaining_cooldown(&self) -> Duration {
        match self.inner.lock().unwrap().tripped_at {
            None => Duration::ZERO,
            Some(at) => self.cooldown.saturating_sub(at.elapsed()),
        }
    }
}
