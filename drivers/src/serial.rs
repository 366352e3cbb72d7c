//! COM1 serial console driver.
//!
//! Output only. The boot path programs the UART once; the print macros
//! take the port mutex per call. The logger in vexos-lib writes the same
//! hardware through its own path and never takes this lock.

use core::fmt::{self, Write};

use spin::Mutex;

use vexos_abi::ports::{
    COM1_BASE, UART_FCR_ENABLE_CLEAR, UART_LCR_8N1, UART_LCR_DLAB, UART_LSR_TX_EMPTY,
    UART_MCR_AUX2, UART_MCR_DTR, UART_MCR_RTS, UART_REG_FCR, UART_REG_IER, UART_REG_LCR,
    UART_REG_LSR, UART_REG_MCR, UART_REG_THR,
};
use vexos_lib::io;

// Bounded transmit-ready poll so a missing UART cannot wedge a writer.
const TX_POLL_LIMIT: u32 = 100_000;

static SERIAL: Mutex<SerialPort> = Mutex::new(SerialPort::new(COM1_BASE));

/// Initialize the COM1 console.
pub fn init() {
    let mut port = SERIAL.lock();
    unsafe {
        port.init();
    }
}

pub fn write_str(s: &str) {
    let _ = SERIAL.lock().write_str(s);
}

pub fn write_line(s: &str) {
    let mut guard = SERIAL.lock();
    let _ = guard.write_str(s);
    let _ = guard.write_str("\r\n");
}

pub fn print_args(args: fmt::Arguments<'_>) {
    let _ = SERIAL.lock().write_fmt(args);
}

struct SerialPort {
    base: u16,
}

impl SerialPort {
    const fn new(base: u16) -> Self {
        Self { base }
    }

    /// Program 115200 8N1 with FIFOs cleared and UART interrupts off.
    unsafe fn init(&mut self) {
        unsafe {
            io::outb(self.base + UART_REG_IER, 0x00);
            io::outb(self.base + UART_REG_LCR, UART_LCR_DLAB);
            // Divisor 1: 115200 baud from the 1.8432 MHz reference clock.
            io::outb(self.base + UART_REG_THR, 0x01);
            io::outb(self.base + UART_REG_IER, 0x00);
            io::outb(self.base + UART_REG_LCR, UART_LCR_8N1);
            io::outb(self.base + UART_REG_FCR, UART_FCR_ENABLE_CLEAR);
            io::outb(
                self.base + UART_REG_MCR,
                UART_MCR_DTR | UART_MCR_RTS | UART_MCR_AUX2,
            );
        }
    }

    fn write_byte(&mut self, byte: u8) {
        unsafe {
            let mut spins = 0u32;
            while (io::inb(self.base + UART_REG_LSR) & UART_LSR_TX_EMPTY) == 0 {
                spins += 1;
                if spins >= TX_POLL_LIMIT {
                    break;
                }
                core::hint::spin_loop();
            }
            io::outb(self.base + UART_REG_THR, byte);
        }
    }
}

impl Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            match b {
                b'\n' => {
                    self.write_byte(b'\r');
                    self.write_byte(b'\n');
                }
                _ => self.write_byte(b),
            }
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {{
        $crate::serial::print_args(core::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! serial_println {
    () => {
        $crate::serial::write_line("");
    };
    ($fmt:expr) => {
        $crate::serial::write_line($fmt);
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::serial::print_args(core::format_args!(concat!($fmt, "\n"), $($arg)*));
    };
}
