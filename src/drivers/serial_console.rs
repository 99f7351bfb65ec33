//! Diagnostic console on USART1
//!
//! USART0 carries the programming protocol and must never see diagnostic
//! output, so logging goes to the second USART.

use avr_device::atmega128a::USART1;
use core::convert::Infallible;
use core::fmt;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

// UCSR1A
const UDRE: u8 = 1 << 5;

// UCSR1B
const TXEN: u8 = 1 << 3;

// UCSR1C: 8N1
const FRAME_8N1: u8 = 0x06;

pub struct SerialConsole {
    _private: (),
}

impl SerialConsole {
    pub fn new(ubrr: u16) -> Self {
        unsafe {
            let p = USART1::ptr();
            (*p).ubrr1h.write(|w| w.bits((ubrr >> 8) as u8));
            (*p).ubrr1l.write(|w| w.bits(ubrr as u8));
            (*p).ucsr1c.write(|w| w.bits(FRAME_8N1));
            (*p).ucsr1b.write(|w| w.bits(TXEN));
        }
        Self { _private: () }
    }

    pub fn write_byte(&mut self, byte: u8) {
        unsafe {
            let p = USART1::ptr();
            while (*p).ucsr1a.read().bits() & UDRE == 0 {}
            (*p).udr1.write(|w| w.bits(byte));
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }
}

impl ufmt::uWrite for SerialConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

impl fmt::Write for SerialConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        // The console was configured before the logger was installed
        let mut console = SerialConsole { _private: () };
        let _ = fmt::Write::write_fmt(
            &mut console,
            format_args!("[{}] {}\r\n", record.level(), record.args()),
        );
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route `log` records to the console.
///
/// Fails if a logger is already installed. Must run before anything logs:
/// AVR has no compare-and-swap, so only the racy setters are available.
pub fn init_logger(_console: &SerialConsole, level: LevelFilter) -> Result<(), SetLoggerError> {
    unsafe {
        log::set_logger_racy(&LOGGER)?;
        log::set_max_level_racy(level);
    }
    Ok(())
}
