//! UART writer and print macros.

use core::fmt;

use crate::mmio::RegisterBank;
use crate::uart::Uart;

/// Implements a writer on top of the SoC UART. The UART must have been
/// initialized with [`Uart::init`].
pub struct UartWriter;

impl fmt::Write for UartWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut uart = unsafe { Uart::mmio() };
        write_bytes(&mut uart, s);
        Ok(())
    }
}

/// Sends `s` through `uart`, translating `\n` into `\r\n`.
pub fn write_bytes<B: RegisterBank>(uart: &mut Uart<B>, s: &str) {
    for b in s.bytes() {
        if b == b'\n' {
            uart.send_byte(b'\r');
        }
        uart.send_byte(b);
    }
}

/// Print to the UART.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        let _ = core::fmt::Write::write_fmt(
            &mut $crate::print::UartWriter,
            core::format_args!($($arg)*),
        );
    };
}

/// Print to the UART, with a newline.
#[macro_export]
macro_rules! println {
    () => {
        $crate::println!("");
    };

    ($($arg:tt)*) => {
        let _ = core::fmt::Write::write_fmt(
            &mut $crate::print::UartWriter,
            core::format_args!("{}\n", core::format_args!($($arg)*)),
        );
    };
}
