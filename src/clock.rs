// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Paces the emulation to the 4004's clock rate
//!
//! Pacing is advisory: nothing about the emulation's correctness depends on
//! it, so tests swap in [Throttle::unlimited] and run flat out.

use std::time::{Duration, Instant};

/// The 4004's clock frequency, in Hz
pub const CLOCK_HZ: u64 = 740_000;

/// Throttles the cycle loop to a target clock period
///
/// [Throttle::realtime] spins until one clock period (~1351ns at 740kHz) has
/// elapsed since the start of the cycle. [Throttle::unlimited] returns
/// immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Throttle {
    period: Option<Duration>,
}

impl Throttle {
    /// Constructs a throttle pacing to [CLOCK_HZ]
    pub fn realtime() -> Self {
        Throttle {
            period: Some(Duration::from_nanos(1_000_000_000 / CLOCK_HZ)),
        }
    }

    /// Constructs a throttle that doesn't wait at all
    /// # Examples
    /// ```rust
    /// # use mcs4::clock::Throttle;
    /// # use std::time::Instant;
    /// let throttle = Throttle::unlimited();
    /// throttle.pace(Instant::now()); // returns immediately
    /// ```
    pub fn unlimited() -> Self {
        Throttle { period: None }
    }

    /// Busy-waits until one clock period has elapsed since `begin`
    pub fn pace(&self, begin: Instant) {
        if let Some(period) = self.period {
            while begin.elapsed() < period {
                std::hint::spin_loop();
            }
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Throttle::realtime()
    }
}
