//! Time operations.
//!
//! Delays are busy loops. They are not calibrated against any clock: the
//! elapsed time depends on the core frequency, so the durations are only
//! approximations.

use crate::cpu;

/// Default number of spin iterations per microsecond.
pub const DEFAULT_ITERATIONS_PER_US: u32 = 6;

/// A single iteration of a busy loop.
pub trait Spin {
    /// Performs one iteration.
    fn spin(&mut self);
}

/// Spins executing a `nop` instruction.
#[derive(Debug, Default, Clone, Copy)]
pub struct Nop;

impl Spin for Nop {
    #[inline(always)]
    fn spin(&mut self) {
        cpu::nop();
    }
}

/// Busy-wait delay.
#[derive(Debug, Clone)]
pub struct SpinDelay<S = Nop> {
    /// Spin primitive.
    spin: S,

    /// Number of spin iterations per microsecond.
    iterations_per_us: u32,
}

impl SpinDelay<Nop> {
    /// Returns a delay that executes `iterations_per_us` `nop` instructions
    /// per microsecond.
    pub const fn new(iterations_per_us: u32) -> SpinDelay<Nop> {
        SpinDelay {
            spin: Nop,
            iterations_per_us,
        }
    }
}

impl Default for SpinDelay<Nop> {
    fn default() -> SpinDelay<Nop> {
        SpinDelay::new(DEFAULT_ITERATIONS_PER_US)
    }
}

impl<S: Spin> SpinDelay<S> {
    /// Returns a delay built on top of `spin`.
    pub const fn with_spin(spin: S, iterations_per_us: u32) -> SpinDelay<S> {
        SpinDelay {
            spin,
            iterations_per_us,
        }
    }

    /// Returns the number of spin iterations per microsecond.
    pub fn iterations_per_us(&self) -> u32 {
        self.iterations_per_us
    }

    /// Returns a reference to the spin primitive.
    pub fn spinner(&self) -> &S {
        &self.spin
    }

    /// Spins for approximately `us` microseconds.
    #[inline(never)]
    pub fn delay_us(&mut self, us: u64) {
        let iterations = us.saturating_mul(self.iterations_per_us.into());
        for _ in 0..iterations {
            self.spin.spin();
        }
    }

    /// Spins for approximately `ms` milliseconds.
    pub fn delay_ms(&mut self, ms: u64) {
        self.delay_us(ms.saturating_mul(1000));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SpinCounter;

    #[test]
    fn delay_ms_spins_per_us_ratio() {
        let mut delay = SpinDelay::with_spin(SpinCounter::new(), 6);
        delay.delay_ms(1);
        assert!(delay.spinner().count() >= 1000 * 6);
        assert_eq!(delay.spinner().count(), 6000);
    }

    #[test]
    fn delay_us_uses_configured_ratio() {
        let mut delay = SpinDelay::with_spin(SpinCounter::new(), 13);
        delay.delay_us(10);
        assert_eq!(delay.spinner().count(), 130);
        assert_eq!(delay.iterations_per_us(), 13);
    }

    #[test]
    fn zero_delay_does_not_spin() {
        let mut delay = SpinDelay::with_spin(SpinCounter::new(), 6);
        delay.delay_us(0);
        delay.delay_ms(0);
        assert_eq!(delay.spinner().count(), 0);

        let mut delay = SpinDelay::with_spin(SpinCounter::new(), 0);
        delay.delay_ms(100);
        assert_eq!(delay.spinner().count(), 0);
    }

    #[test]
    fn default_ratio() {
        let delay = SpinDelay::default();
        assert_eq!(delay.iterations_per_us(), DEFAULT_ITERATIONS_PER_US);
    }
}
