//! Blinking a GPIO pin.

use crate::gpio::{self, Function, Gpio, Level, Pin};
use crate::mmio::RegisterBank;
use crate::time::{Spin, SpinDelay};

/// Parameters of a [`Blinker`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlinkConfig {
    /// GPIO pin to toggle.
    pub pin: u32,

    /// Time in milliseconds the pin stays high.
    pub high_ms: u64,

    /// Time in milliseconds the pin stays low.
    pub low_ms: u64,
}

impl Default for BlinkConfig {
    /// GPIO16, 100ms high and 100ms low.
    fn default() -> BlinkConfig {
        BlinkConfig {
            pin: 16,
            high_ms: 100,
            low_ms: 100,
        }
    }
}

/// Toggles a GPIO pin forever.
///
/// The blinker alternates between two phases. In each phase it drives the
/// pin to the phase level and then waits. There is no terminal phase.
pub struct Blinker<B, S> {
    /// GPIO controller.
    gpio: Gpio<B>,

    /// Delay used between transitions.
    delay: SpinDelay<S>,

    /// Toggled pin.
    pin: Pin,

    /// Duration of the high phase in milliseconds.
    high_ms: u64,

    /// Duration of the low phase in milliseconds.
    low_ms: u64,

    /// Level driven by the next step.
    phase: Level,
}

impl<B: RegisterBank, S: Spin> Blinker<B, S> {
    /// Configures `config.pin` as output and returns a [`Blinker`] that starts
    /// with the high phase.
    pub fn new(
        mut gpio: Gpio<B>,
        delay: SpinDelay<S>,
        config: BlinkConfig,
    ) -> Result<Blinker<B, S>, gpio::Error> {
        let pin = Pin::try_from(config.pin)?;
        gpio.configure(pin, Function::Output.into());

        Ok(Blinker {
            gpio,
            delay,
            pin,
            high_ms: config.high_ms,
            low_ms: config.low_ms,
            phase: Level::High,
        })
    }

    /// Returns the level driven by the next step.
    pub fn phase(&self) -> Level {
        self.phase
    }

    /// Drives the pin to the current phase level, waits and moves to the
    /// other phase.
    pub fn step(&mut self) {
        self.gpio.drive(self.pin, self.phase);

        let ms = match self.phase {
            Level::High => self.high_ms,
            Level::Low => self.low_ms,
        };
        self.delay.delay_ms(ms);

        self.phase = self.phase.toggled();
    }

    /// Runs `n` full cycles. A cycle is a high phase followed by a low phase,
    /// regardless of the phase the blinker is currently in.
    pub fn run_cycles(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
            self.step();
        }
    }

    /// Runs forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Returns the GPIO controller.
    pub fn gpio(&self) -> &Gpio<B> {
        &self.gpio
    }

    /// Returns the delay.
    pub fn delay(&self) -> &SpinDelay<S> {
        &self.delay
    }
}
