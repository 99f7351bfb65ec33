//! Blocking byte transport

use embedded_hal::serial::{Read, Write};
use nb::block;

/// Blocking, byte-oriented duplex channel to the programming host.
///
/// Neither method has a timeout: `read_byte` waits for as long as it takes
/// for the host to send something. Implementations for real hardware use
/// `core::convert::Infallible` as their error type; fallible implementations
/// exist for host-side testing and end the engine's run with their error.
pub trait Transport {
    type Error;

    /// Wait for the next byte from the host.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Send one byte and wait until it has left the shift register.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// Adapts an `embedded-hal` serial port to [`Transport`].
///
/// A byte counts as transmitted once `flush` completes, so the port's flush
/// is expected to wait for (and acknowledge) transmit-complete.
pub struct SerialTransport<S> {
    serial: S,
}

impl<S> SerialTransport<S> {
    pub fn new(serial: S) -> Self {
        Self { serial }
    }

    pub fn release(self) -> S {
        self.serial
    }
}

impl<S, E> Transport for SerialTransport<S>
where
    S: Read<u8, Error = E> + Write<u8, Error = E>,
{
    type Error = E;

    fn read_byte(&mut self) -> Result<u8, E> {
        block!(self.serial.read())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), E> {
        block!(self.serial.write(byte))?;
        block!(self.serial.flush())
    }
}
