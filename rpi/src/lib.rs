//! rpi drives the GPIO block of the Raspberry Pi 3 Model B from bare metal.
//!
//! Every peripheral is accessed through a [`mmio::RegisterBank`]. On the board
//! the banks are [`mmio::MmioBank`]s mapped onto the peripheral address space;
//! on the host they can be replaced by [`sim::SimBank`]s, which makes the
//! drivers testable without hardware.
//!
//! The firmware image is expected to be linked with the `.entry` section at
//! 0x80000, using a static relocation model and a large code model. The
//! following example shows how to do this using a Cargo configuration file.
//!
//! ```text
//! [target.aarch64-unknown-none]
//! rustflags = [
//!     "-Ccode-model=large",
//!     "-Crelocation-model=static",
//!     "-Clink-arg=--nmagic",
//!     "-Clink-arg=--image-base=0x80000",
//!     "-Clink-arg=--section-start=.entry=0x80000",
//! ]
//! ```

#![no_std]

pub mod blink;
pub mod cpu;
pub mod gpio;
pub mod mmio;
pub mod print;
pub mod sim;
pub mod time;
pub mod uart;
