//! Memory mapped I/O operations.
//!
//! For more information, please see [BCM2835 ARM Peripherals specification].
//!
//! [BCM2835 ARM Peripherals specification]: https://datasheets.raspberrypi.com/bcm2835/bcm2835-peripherals.pdf

use core::ptr::{read_volatile, write_volatile};

/// MMIO base address.
///
/// [/arch/arm/boot/dts/bcm2837.dtsi] defines the following mapping:
///
/// ```text
/// <0x7e000000 0x3f000000 0x1000000>
/// ```
///
/// [/arch/arm/boot/dts/bcm2837.dtsi]: https://github.com/raspberrypi/linux/blob/770d94882ac145c81af72e9a37180806c3f70bbd/arch/arm/boot/dts/bcm2837.dtsi#L9-L10
pub const MMIO_BASE: usize = 0x3f000000;

/// Size in bytes of a register.
const REG_SIZE: usize = 4;

/// A contiguous block of 32-bit registers addressed by word index.
///
/// Implementations must perform exactly one access per call. Values are never
/// cached and calls are never merged, so the sequence of accesses seen by the
/// device is the sequence of calls.
pub trait RegisterBank {
    /// Reads the register at `index`.
    fn read(&mut self, index: usize) -> u32;

    /// Writes `val` into the register at `index`.
    fn write(&mut self, index: usize, val: u32);
}

/// Read register. `reg` is the offset of the register from the MMIO base
/// address.
///
/// # Safety
///
/// This function reads an arbitrary memory address, thus it is unsafe.
pub unsafe fn read(reg: usize) -> u32 {
    read_volatile((MMIO_BASE + reg) as *const u32)
}

/// Write value into register. `reg` is the offset of the register from the
/// MMIO base address.
///
/// # Safety
///
/// This function writes to an arbitrary memory address, thus it is unsafe.
pub unsafe fn write(reg: usize, val: u32) {
    write_volatile((MMIO_BASE + reg) as *mut u32, val)
}

/// Register bank backed by device memory.
#[derive(Debug)]
pub struct MmioBank {
    /// Offset of the first register from the MMIO base address.
    offset: usize,

    /// Number of registers in the bank.
    len: usize,
}

impl MmioBank {
    /// Returns a bank of `len` registers starting at `offset` bytes from the
    /// MMIO base address.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that the region is a valid peripheral region
    /// and that no other bank aliases it.
    pub const unsafe fn new(offset: usize, len: usize) -> MmioBank {
        MmioBank { offset, len }
    }

    /// Returns the number of registers in the bank.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bank has no registers.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the offset of the register at `index`.
    fn reg(&self, index: usize) -> usize {
        assert!(index < self.len, "register index out of bounds: {index}");
        self.offset + index * REG_SIZE
    }
}

impl RegisterBank for MmioBank {
    fn read(&mut self, index: usize) -> u32 {
        let reg = self.reg(index);
        unsafe { read(reg) }
    }

    fn write(&mut self, index: usize, val: u32) {
        let reg = self.reg(index);
        unsafe { write(reg, val) }
    }
}
