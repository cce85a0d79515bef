//! CPU specific operations.
//!
//! On targets other than AArch64 the instructions degrade to spin-loop hints,
//! so the crate can be exercised on the host.

#[cfg(target_arch = "aarch64")]
use core::arch::asm;

/// nop instruction.
///
/// The instruction is always emitted, so loops built on top of it are never
/// optimized away.
#[inline(always)]
pub fn nop() {
    #[cfg(target_arch = "aarch64")]
    unsafe {
        asm!("nop")
    };

    #[cfg(not(target_arch = "aarch64"))]
    core::hint::spin_loop();
}

/// wfe instruction.
///
/// Wait For Event is a hint instruction that indicates that the PE can enter a
/// low-power state and remain there until a wakeup event occurs.
#[inline(always)]
pub fn wfe() {
    #[cfg(target_arch = "aarch64")]
    unsafe {
        asm!("wfe")
    };

    #[cfg(not(target_arch = "aarch64"))]
    core::hint::spin_loop();
}
