//! Simulated peripherals.
//!
//! These types stand in for the hardware when running on the host. They keep
//! track of every access, so callers can check exactly what a driver did.

use crate::mmio::RegisterBank;
use crate::time::Spin;

/// In-memory register bank with `N` registers.
#[derive(Debug, Clone)]
pub struct SimBank<const N: usize> {
    /// Register values.
    regs: [u32; N],

    /// Number of reads performed.
    reads: usize,

    /// Number of writes performed.
    writes: usize,

    /// Index and value of the last write.
    last_write: Option<(usize, u32)>,
}

impl<const N: usize> SimBank<N> {
    /// Returns a bank with all registers cleared.
    pub const fn new() -> SimBank<N> {
        SimBank::with_values([0; N])
    }

    /// Returns a bank whose registers hold `regs`.
    pub const fn with_values(regs: [u32; N]) -> SimBank<N> {
        SimBank {
            regs,
            reads: 0,
            writes: 0,
            last_write: None,
        }
    }

    /// Returns the current register values without counting an access.
    pub fn values(&self) -> &[u32; N] {
        &self.regs
    }

    /// Sets the register at `index` without counting an access. It models the
    /// device changing its own state.
    pub fn poke(&mut self, index: usize, val: u32) {
        self.regs[index] = val;
    }

    /// Number of reads performed through [`RegisterBank::read`].
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Number of writes performed through [`RegisterBank::write`].
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Index and value of the last write, if any.
    pub fn last_write(&self) -> Option<(usize, u32)> {
        self.last_write
    }

    /// Resets the access counters.
    pub fn reset_counters(&mut self) {
        self.reads = 0;
        self.writes = 0;
        self.last_write = None;
    }
}

impl<const N: usize> Default for SimBank<N> {
    fn default() -> SimBank<N> {
        SimBank::new()
    }
}

impl<const N: usize> RegisterBank for SimBank<N> {
    fn read(&mut self, index: usize) -> u32 {
        self.reads += 1;
        self.regs[index]
    }

    fn write(&mut self, index: usize, val: u32) {
        self.writes += 1;
        self.last_write = Some((index, val));
        self.regs[index] = val;
    }
}

/// Spin primitive that counts iterations instead of burning cycles.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinCounter {
    /// Number of iterations performed.
    count: u64,
}

impl SpinCounter {
    /// Returns a counter set to zero.
    pub const fn new() -> SpinCounter {
        SpinCounter { count: 0 }
    }

    /// Number of iterations performed.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Spin for SpinCounter {
    fn spin(&mut self) {
        self.count += 1;
    }
}
