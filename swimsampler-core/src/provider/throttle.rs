//! Politeness throttle between provider requests.
//!
//! The delay is a cross-cutting policy, not core logic: it is injected into
//! the provider, and nothing downstream depends on a particular value. The
//! default pauses a random 500–1500 ms so request timing stays
//! unpredictable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

/// A pause policy invoked before every outgoing provider request.
pub trait Throttle: Send + Sync {
    fn pause(&self);
}

/// Uniform random delay within `[min, max]`.
pub struct UniformJitter {
    min_ms: u64,
    max_ms: u64,
    rng: Mutex<StdRng>,
}

impl UniformJitter {
    pub fn new(min: Duration, max: Duration) -> Self {
        let min_ms = min.as_millis() as u64;
        let max_ms = max.as_millis() as u64;
        assert!(min_ms <= max_ms, "throttle range is inverted");
        Self {
            min_ms,
            max_ms,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Default politeness window: 500–1500 ms.
    pub fn default_polite() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_millis(1500))
    }
}

impl Throttle for UniformJitter {
    fn pause(&self) {
        let ms = self.rng.lock().unwrap().gen_range(self.min_ms..=self.max_ms);
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// No delay at all. Used by tests and offline planning.
pub struct NoThrottle;

impl Throttle for NoThrottle {
    fn pause(&self) {}
}
