//! Speed limiting between bursts.

use std::time::Duration;

/// Holds emulation to a target clock rate by sleeping after each burst.
#[derive(Clone, Debug)]
pub struct Throttle {
    target_cycles_per_sec: Option<u64>,
}

impl Throttle {
    /// `None` runs as fast as the host allows.
    pub fn new(target_cycles_per_sec: Option<u64>) -> Self {
        Self {
            target_cycles_per_sec,
        }
    }

    pub fn target(&self) -> Option<u64> {
        self.target_cycles_per_sec
    }

    /// How long to sleep after a burst of `cycles` that took `elapsed` of
    /// wall-clock time so that the average rate matches the target.
    pub fn delay_for(&self, cycles: u64, elapsed: Duration) -> Duration {
        match self.target_cycles_per_sec {
            Some(rate) if rate > 0 => {
                let wanted = Duration::from_secs_f64(cycles as f64 / rate as f64);
                wanted.saturating_sub(elapsed)
            }
            _ => Duration::ZERO,
        }
    }

    /// Sleep for [`Throttle::delay_for`] and return the time slept.
    pub fn pace(&self, cycles: u64, elapsed: Duration) -> Duration {
        let delay = self.delay_for(cycles, elapsed);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        delay
    }
}
