//! GPIO operations.
//!
//! For more information, please see [BCM2835 ARM Peripherals specification].
//!
//! [BCM2835 ARM Peripherals specification]: https://datasheets.raspberrypi.com/bcm2835/bcm2835-peripherals.pdf

use core::fmt;

use crate::mmio::{MmioBank, RegisterBank};

/// Base address of GPIO.
///
/// [/arch/arm/boot/dts/bcm283x.dtsi] describes it:
///
/// ```text
/// gpio: gpio@7e200000 {
///     compatible = "brcm,bcm2835-gpio";
///     reg = <0x7e200000 0xb4>;
///     ...
/// };
/// ```
///
/// [/arch/arm/boot/dts/bcm283x.dtsi]: https://github.com/raspberrypi/linux/blob/770d94882ac145c81af72e9a37180806c3f70bbd/arch/arm/boot/dts/bcm283x.dtsi#L107-L302
pub const GPIO_BASE: usize = 0x200000;

/// Base address of GPFSELn registers.
const GPFSEL_BASE: usize = GPIO_BASE;

/// Base address of GPSETn registers.
const GPSET_BASE: usize = GPIO_BASE + 0x1c;

/// Base address of GPCLRn registers.
const GPCLR_BASE: usize = GPIO_BASE + 0x28;

/// Number of GPIO pins.
pub const NPINS: u32 = 54;

/// Number of GPFSELn registers.
pub const NFSEL: usize = 6;

/// Number of GPSETn and GPCLRn registers.
pub const NLEVEL: usize = 2;

/// Pins per GPFSELn register.
const PINS_PER_FSEL: u32 = 10;

/// Bits per pin in a GPFSELn register.
const FSEL_BITS: u32 = 3;

/// Mask of a function code.
const FSEL_MASK: u32 = 0b111;

/// Pins per GPSETn and GPCLRn register.
const PINS_PER_LEVEL: u32 = 32;

/// GPIO error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid GPIO pin.
    InvalidGpioPin(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidGpioPin(pin) => write!(f, "invalid GPIO pin: {pin}"),
        }
    }
}

/// Represents a GPIO pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pin(u32);

impl TryFrom<u32> for Pin {
    type Error = Error;

    fn try_from(pin: u32) -> Result<Pin, Error> {
        if pin >= NPINS {
            return Err(Error::InvalidGpioPin(pin));
        }
        Ok(Pin(pin))
    }
}

impl From<Pin> for u32 {
    fn from(pin: Pin) -> u32 {
        pin.0
    }
}

impl Pin {
    /// Index of the GPFSELn register that holds the pin.
    pub fn fsel_index(self) -> usize {
        (self.0 / PINS_PER_FSEL) as usize
    }

    /// Position of the pin's function field within its GPFSELn register.
    pub fn fsel_shift(self) -> u32 {
        (self.0 % PINS_PER_FSEL) * FSEL_BITS
    }

    /// Index of the GPSETn/GPCLRn register that holds the pin.
    pub fn level_index(self) -> usize {
        (self.0 / PINS_PER_LEVEL) as usize
    }

    /// Position of the pin's bit within its GPSETn/GPCLRn register.
    pub fn level_shift(self) -> u32 {
        self.0 % PINS_PER_LEVEL
    }
}

/// Pin function.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Function {
    /// Input pin.
    Input,

    /// Output pin.
    Output,

    /// Alternate function 0.
    Alt0,

    /// Alternate function 1.
    Alt1,

    /// Alternate function 2.
    Alt2,

    /// Alternate function 3.
    Alt3,

    /// Alternate function 4.
    Alt4,

    /// Alternate function 5.
    Alt5,
}

impl From<Function> for u32 {
    fn from(fcn: Function) -> u32 {
        match fcn {
            Function::Input => 0b000,
            Function::Output => 0b001,
            Function::Alt0 => 0b100,
            Function::Alt1 => 0b101,
            Function::Alt2 => 0b110,
            Function::Alt3 => 0b111,
            Function::Alt4 => 0b011,
            Function::Alt5 => 0b010,
        }
    }
}

/// Pin level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    /// Low level.
    Low,

    /// High level.
    High,
}

impl Level {
    /// Returns the opposite level.
    pub fn toggled(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Level::Low => write!(f, "Low"),
            Level::High => write!(f, "High"),
        }
    }
}

/// GPIO controller.
///
/// It owns the three register banks used to drive the pins: GPFSELn, GPSETn
/// and GPCLRn.
#[derive(Debug)]
pub struct Gpio<B> {
    /// GPFSELn registers.
    fsel: B,

    /// GPSETn registers.
    set: B,

    /// GPCLRn registers.
    clr: B,
}

impl Gpio<MmioBank> {
    /// Returns the GPIO controller of the SoC.
    ///
    /// # Safety
    ///
    /// The returned value accesses device memory. Only one instance must be
    /// alive at a time.
    pub unsafe fn mmio() -> Gpio<MmioBank> {
        Gpio {
            fsel: MmioBank::new(GPFSEL_BASE, NFSEL),
            set: MmioBank::new(GPSET_BASE, NLEVEL),
            clr: MmioBank::new(GPCLR_BASE, NLEVEL),
        }
    }
}

impl<B: RegisterBank> Gpio<B> {
    /// Returns a GPIO controller built on top of the provided banks.
    pub fn new(fsel: B, set: B, clr: B) -> Gpio<B> {
        Gpio { fsel, set, clr }
    }

    /// Configures the operation of a GPIO pin.
    pub fn set_function(&mut self, pin: u32, fcn: Function) -> Result<(), Error> {
        self.set_function_code(pin, fcn.into())
    }

    /// Configures the operation of a GPIO pin using a raw function code. Only
    /// the 3 least significant bits of `code` are used.
    pub fn set_function_code(&mut self, pin: u32, code: u32) -> Result<(), Error> {
        let pin = Pin::try_from(pin)?;
        self.configure(pin, code);
        Ok(())
    }

    /// Configures a GPIO pin as output.
    pub fn make_output(&mut self, pin: u32) -> Result<(), Error> {
        self.set_function(pin, Function::Output)
    }

    /// Sets a GPIO pin.
    pub fn set(&mut self, pin: u32) -> Result<(), Error> {
        let pin = Pin::try_from(pin)?;
        self.drive(pin, Level::High);
        Ok(())
    }

    /// Clears a GPIO pin.
    pub fn clear(&mut self, pin: u32) -> Result<(), Error> {
        let pin = Pin::try_from(pin)?;
        self.drive(pin, Level::Low);
        Ok(())
    }

    /// Writes the function `code` into the GPFSELn field of `pin`.
    pub fn configure(&mut self, pin: Pin, code: u32) {
        // Read the initial register value.
        let n = pin.fsel_index();
        let reg = self.fsel.read(n);

        // Write register.
        let shift = pin.fsel_shift();
        let mask = FSEL_MASK << shift;
        let code = (code & FSEL_MASK) << shift;
        self.fsel.write(n, (reg & !mask) | code);
    }

    /// Drives `pin` to `level`.
    pub fn drive(&mut self, pin: Pin, level: Level) {
        let n = pin.level_index();
        let reg = 1 << pin.level_shift();
        match level {
            Level::High => self.set.write(n, reg),
            Level::Low => self.clr.write(n, reg),
        }
    }

    /// Returns the GPFSELn bank.
    pub fn fsel_bank(&self) -> &B {
        &self.fsel
    }

    /// Returns the GPSETn bank.
    pub fn set_bank(&self) -> &B {
        &self.set
    }

    /// Returns the GPCLRn bank.
    pub fn clear_bank(&self) -> &B {
        &self.clr
    }

    /// Consumes the controller and returns its GPFSELn, GPSETn and GPCLRn
    /// banks.
    pub fn into_banks(self) -> (B, B, B) {
        (self.fsel, self.set, self.clr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBank;

    type SimGpio = Gpio<SimBank<NFSEL>>;

    /// Background pattern used to detect stray writes.
    const PATTERN: [u32; NFSEL] = [
        0xdead_beef,
        0x0123_4567,
        0x89ab_cdef,
        0xffff_ffff,
        0x0000_0000,
        0x5555_5555,
    ];

    fn sim_gpio(fsel: [u32; NFSEL]) -> SimGpio {
        Gpio::new(
            SimBank::with_values(fsel),
            SimBank::new(),
            SimBank::new(),
        )
    }

    #[test]
    fn pin_range() {
        assert_eq!(Pin::try_from(0u32).map(u32::from), Ok(0));
        assert_eq!(Pin::try_from(53u32).map(u32::from), Ok(53));
        assert_eq!(Pin::try_from(54u32), Err(Error::InvalidGpioPin(54)));
        assert_eq!(Pin::try_from(u32::MAX), Err(Error::InvalidGpioPin(u32::MAX)));
    }

    #[test]
    fn configure_touches_only_pin_field() {
        for pin in 0..NPINS {
            for code in 0..=0b111 {
                let mut gpio = sim_gpio(PATTERN);
                gpio.set_function_code(pin, code).unwrap();

                let n = (pin / 10) as usize;
                let shift = (pin % 10) * 3;
                let mask = 0b111 << shift;
                let fsel = gpio.fsel_bank();
                for (i, &reg) in fsel.values().iter().enumerate() {
                    if i == n {
                        assert_eq!(reg & !mask, PATTERN[i] & !mask);
                        assert_eq!((reg & mask) >> shift, code);
                    } else {
                        assert_eq!(reg, PATTERN[i]);
                    }
                }
                assert_eq!(fsel.reads(), 1);
                assert_eq!(fsel.writes(), 1);
                assert_eq!(gpio.set_bank().writes(), 0);
                assert_eq!(gpio.clear_bank().writes(), 0);
            }
        }
    }

    #[test]
    fn function_code_is_masked() {
        let mut gpio = sim_gpio([0; NFSEL]);
        gpio.set_function_code(3, 0xffff_fff9).unwrap();
        assert_eq!(gpio.fsel_bank().values()[0], 0b001 << 9);
    }

    #[test]
    fn make_output_pin_16() {
        let mut gpio = sim_gpio(PATTERN);
        gpio.make_output(16).unwrap();

        let reg = gpio.fsel_bank().values()[1];
        assert_eq!((reg >> 18) & 0b111, 0b001);
        assert_eq!(reg & !(0b111 << 18), PATTERN[1] & !(0b111 << 18));
    }

    #[test]
    fn alt_function_codes() {
        let mut gpio = sim_gpio([0; NFSEL]);
        gpio.set_function(14, Function::Alt0).unwrap();
        gpio.set_function(15, Function::Alt5).unwrap();
        assert_eq!(gpio.fsel_bank().values()[1], (0b100 << 12) | (0b010 << 15));
    }

    #[test]
    fn set_writes_single_bit() {
        for pin in 0..NPINS {
            let mut gpio = sim_gpio(PATTERN);
            gpio.set(pin).unwrap();

            let n = (pin / 32) as usize;
            let set = gpio.set_bank();
            assert_eq!(set.writes(), 1);
            assert_eq!(set.last_write(), Some((n, 1 << (pin % 32))));
            assert_eq!(set.reads(), 0);
            assert_eq!(gpio.clear_bank().writes(), 0);
            assert_eq!(gpio.fsel_bank().values(), &PATTERN);
        }
    }

    #[test]
    fn clear_writes_single_bit() {
        for pin in 0..NPINS {
            let mut gpio = sim_gpio(PATTERN);
            gpio.clear(pin).unwrap();

            let n = (pin / 32) as usize;
            let clr = gpio.clear_bank();
            assert_eq!(clr.writes(), 1);
            assert_eq!(clr.last_write(), Some((n, 1 << (pin % 32))));
            assert_eq!(clr.reads(), 0);
            assert_eq!(gpio.set_bank().writes(), 0);
            assert_eq!(gpio.fsel_bank().values(), &PATTERN);
        }
    }

    #[test]
    fn set_and_clear_pin_16() {
        let mut gpio = sim_gpio([0; NFSEL]);
        gpio.set(16).unwrap();
        gpio.clear(16).unwrap();
        assert_eq!(gpio.set_bank().last_write(), Some((0, 1 << 16)));
        assert_eq!(gpio.clear_bank().last_write(), Some((0, 1 << 16)));
    }

    #[test]
    fn invalid_pins_are_ignored() {
        for pin in [54, 55, 63, 64, 1000, u32::MAX] {
            let mut gpio = sim_gpio(PATTERN);

            assert_eq!(gpio.set(pin), Err(Error::InvalidGpioPin(pin)));
            assert_eq!(gpio.clear(pin), Err(Error::InvalidGpioPin(pin)));
            assert_eq!(gpio.make_output(pin), Err(Error::InvalidGpioPin(pin)));
            assert_eq!(
                gpio.set_function_code(pin, 0b111),
                Err(Error::InvalidGpioPin(pin))
            );

            let (fsel, set, clr) = gpio.into_banks();
            for bank in [&fsel, &set, &clr] {
                assert_eq!(bank.reads(), 0);
                assert_eq!(bank.writes(), 0);
            }
            assert_eq!(fsel.values(), &PATTERN);
            assert_eq!(set.values(), &[0; NFSEL]);
            assert_eq!(clr.values(), &[0; NFSEL]);
        }
    }

    #[test]
    fn level_toggled() {
        assert_eq!(Level::High.toggled(), Level::Low);
        assert_eq!(Level::Low.toggled(), Level::High);
    }
}
