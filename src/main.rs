//! blinky toggles GPIO16 of the Raspberry Pi 3 Model B forever.
//!
//! When built for a hosted target, the firmware runs a few cycles against
//! simulated registers and prints the register traffic instead.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

use rpi::blink::{BlinkConfig, Blinker};
use rpi::gpio::Gpio;
use rpi::time::{SpinDelay, DEFAULT_ITERATIONS_PER_US};

#[cfg(target_os = "none")]
use rpi::{println, uart::Uart};
#[cfg(target_os = "none")]
use rpi_macros::entrypoint;

/// Kernel main function.
#[cfg(target_os = "none")]
#[entrypoint]
fn kernel_main() {
    let mut gpio = unsafe { Gpio::mmio() };

    // Initialize the UART.
    let mut uart = unsafe { Uart::mmio() };
    if uart.init(&mut gpio).is_err() {
        return;
    }

    let config = BlinkConfig::default();
    println!(
        "blinky: GPIO{} high={}ms low={}ms",
        config.pin, config.high_ms, config.low_ms
    );

    let delay = SpinDelay::new(DEFAULT_ITERATIONS_PER_US);
    let mut blinker = match Blinker::new(gpio, delay, config) {
        Ok(blinker) => blinker,
        Err(err) => {
            println!("blinky: {}", err);
            return;
        }
    };

    blinker.run()
}

/// Number of cycles simulated on hosted targets.
#[cfg(not(target_os = "none"))]
const SIM_CYCLES: usize = 3;

#[cfg(not(target_os = "none"))]
fn main() {
    use rpi::gpio::{Level, NFSEL};
    use rpi::sim::{SimBank, SpinCounter};

    let gpio = Gpio::new(
        SimBank::<NFSEL>::new(),
        SimBank::new(),
        SimBank::new(),
    );
    let delay = SpinDelay::with_spin(SpinCounter::new(), DEFAULT_ITERATIONS_PER_US);
    let config = BlinkConfig::default();

    let mut blinker = match Blinker::new(gpio, delay, config) {
        Ok(blinker) => blinker,
        Err(err) => {
            eprintln!("blinky: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "blinky: GPIO{} high={}ms low={}ms (simulated)",
        config.pin, config.high_ms, config.low_ms
    );
    println!("GPFSEL: {:#010x?}", blinker.gpio().fsel_bank().values());

    for _ in 0..SIM_CYCLES * 2 {
        let level = blinker.phase();
        blinker.step();

        let gpio = blinker.gpio();
        let write = match level {
            Level::High => gpio.set_bank().last_write(),
            Level::Low => gpio.clear_bank().last_write(),
        };
        if let Some((n, val)) = write {
            println!(
                "{level} reg={n} val={val:#010x} spins={}",
                blinker.delay().spinner().count()
            );
        }
    }
}
