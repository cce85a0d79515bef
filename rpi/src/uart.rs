//! PL011 UART driver.
//!
//! For more information, please see:
//!
//! - [BCM2835 ARM Peripherals specification].
//! - [PL011 Technical Reference Manual].
//!
//! [BCM2835 ARM Peripherals specification]: https://datasheets.raspberrypi.com/bcm2835/bcm2835-peripherals.pdf
//! [PL011 Technical Reference Manual]: https://static6.arrow.com/aropdfconversion/32f6a7175ece91477c63bc40811c02e077718861/ddi0183.pdf

use core::fmt;

use crate::gpio::{self, Function, Gpio};
use crate::mmio::{MmioBank, RegisterBank};

/// Base address of the PL011 UART.
///
/// [/arch/arm/boot/dts/bcm283x.dtsi] describes it:
///
/// ```text
/// uart0: serial@7e201000 {
///     compatible = "arm,pl011", "arm,primecell";
///     reg = <0x7e201000 0x200>;
///     ...
/// };
/// ```
///
/// [/arch/arm/boot/dts/bcm283x.dtsi]: https://github.com/raspberrypi/linux/blob/770d94882ac145c81af72e9a37180806c3f70bbd/arch/arm/boot/dts/bcm283x.dtsi#L304-L312
const UART_BASE: usize = 0x201000;

/// Number of registers up to and including UARTICR.
pub const NREGS: usize = 18;

/// UART data register.
const UARTDR: usize = 0x00 / 4;

/// UART flag register.
const UARTFR: usize = 0x18 / 4;

/// Receive FIFO empty.
pub const UARTFR_RXFE: u32 = 0x10;

/// Transmit FIFO full.
pub const UARTFR_TXFF: u32 = 0x20;

/// UART integer baud rate register.
const UARTIBRD: usize = 0x24 / 4;

/// UART fractional baud rate register.
const UARTFBRD: usize = 0x28 / 4;

/// UART line control register.
const UARTLCR_H: usize = 0x2c / 4;

/// UART control register.
const UARTCR: usize = 0x30 / 4;

/// UART interrupt mask set/clear register.
const UARTIMSC: usize = 0x38 / 4;

/// UART interrupt clear register.
const UARTICR: usize = 0x44 / 4;

/// TX pin.
const PIN_TX: u32 = 14;

/// RX pin.
const PIN_RX: u32 = 15;

/// UART error.
#[derive(Debug)]
pub enum Error {
    /// GPIO error.
    GpioError(gpio::Error),
}

impl From<gpio::Error> for Error {
    fn from(err: gpio::Error) -> Error {
        Error::GpioError(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::GpioError(err) => write!(f, "GPIO error: {err}"),
        }
    }
}

/// PL011 UART.
#[derive(Debug)]
pub struct Uart<B> {
    /// UART registers.
    regs: B,
}

impl Uart<MmioBank> {
    /// Returns the PL011 UART of the SoC.
    ///
    /// # Safety
    ///
    /// The returned value accesses device memory.
    pub unsafe fn mmio() -> Uart<MmioBank> {
        Uart {
            regs: MmioBank::new(UART_BASE, NREGS),
        }
    }
}

impl<B: RegisterBank> Uart<B> {
    /// Returns a UART built on top of `regs`.
    pub fn new(regs: B) -> Uart<B> {
        Uart { regs }
    }

    /// Initializes the UART. The TX and RX pins are configured through
    /// `gpio`.
    ///
    /// The UART clock is not configured. The firmware default of 48MHz is
    /// assumed.
    pub fn init<G: RegisterBank>(&mut self, gpio: &mut Gpio<G>) -> Result<(), Error> {
        // Mask all UART interrupts. RIMIM, DCDMIM and DSRMIM are unsupported,
        // so we write 0.
        self.regs.write(
            UARTIMSC,
            (1 << 1)
                | (1 << 4)
                | (1 << 5)
                | (1 << 6)
                | (1 << 7)
                | (1 << 8)
                | (1 << 9)
                | (1 << 10),
        );

        // Clear all UART interrupts.
        self.regs.write(UARTICR, 0x7ff);

        // Disable UART.
        self.regs.write(UARTCR, 0);

        // Route pins 14 (TX) and 15 (RX) to the UART.
        gpio.set_function(PIN_TX, Function::Alt0)?;
        gpio.set_function(PIN_RX, Function::Alt0)?;

        // Configure the baud rate divisor.
        // BRD = UARTCLK / (16 * Baud rate) = 48000000 / (16 * 115200) = 26.0416
        // UARTIBRD = BRDi = 26
        self.regs.write(UARTIBRD, 26);
        // UARTFBRD = int((BRDf * 2**6) + 0.5) = int((0.0416 * 64) + 0.5) = 3
        self.regs.write(UARTFBRD, 3);

        // Set UART to 8n1 and enable FIFOs.
        self.regs.write(UARTLCR_H, (1 << 4) | (1 << 5) | (1 << 6));

        // Enable UART, transmit and receive.
        self.regs.write(UARTCR, (1 << 0) | (1 << 8) | (1 << 9));

        Ok(())
    }

    /// Transmits a byte.
    pub fn send_byte(&mut self, b: u8) {
        // Wait while the transmit FIFO is full.
        while self.regs.read(UARTFR) & UARTFR_TXFF != 0 {}

        // Write byte.
        self.regs.write(UARTDR, b as u32);
    }

    /// Receives a byte.
    pub fn recv_byte(&mut self) -> u8 {
        // Wait while the receive FIFO is empty.
        while self.regs.read(UARTFR) & UARTFR_RXFE != 0 {}

        // Read byte.
        self.regs.read(UARTDR) as u8
    }

    /// Returns the UART registers.
    pub fn regs(&self) -> &B {
        &self.regs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::NFSEL;
    use crate::sim::SimBank;

    #[test]
    fn init_programs_uart_and_pins() {
        let mut gpio = Gpio::new(
            SimBank::<NFSEL>::new(),
            SimBank::new(),
            SimBank::new(),
        );
        let mut uart = Uart::new(SimBank::<NREGS>::new());
        uart.init(&mut gpio).unwrap();

        let regs = uart.regs().values();
        assert_eq!(regs[UARTIMSC], 0x7f2);
        assert_eq!(regs[UARTICR], 0x7ff);
        assert_eq!(regs[UARTIBRD], 26);
        assert_eq!(regs[UARTFBRD], 3);
        assert_eq!(regs[UARTLCR_H], 0x70);
        assert_eq!(regs[UARTCR], 0x301);

        assert_eq!(gpio.fsel_bank().values()[1], (0b100 << 12) | (0b100 << 15));
        assert_eq!(gpio.set_bank().writes(), 0);
        assert_eq!(gpio.clear_bank().writes(), 0);
    }

    #[test]
    fn send_byte_writes_data_register() {
        let mut uart = Uart::new(SimBank::<NREGS>::new());
        uart.send_byte(b'x');

        assert_eq!(uart.regs().last_write(), Some((UARTDR, b'x' as u32)));
        assert_eq!(uart.regs().reads(), 1);
    }

    #[test]
    fn recv_byte_reads_data_register() {
        let mut bank = SimBank::<NREGS>::new();
        bank.poke(UARTDR, 0x141);
        let mut uart = Uart::new(bank);

        assert_eq!(uart.recv_byte(), 0x41);
        assert_eq!(uart.regs().reads(), 2);
        assert_eq!(uart.regs().writes(), 0);
    }
}
