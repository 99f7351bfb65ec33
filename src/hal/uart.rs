//! Polled USART0 driver for the programming link

use avr_device::atmega128a::USART0;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::serial;

// UCSR0A
const RXC: u8 = 1 << 7;
const TXC: u8 = 1 << 6;
const UDRE: u8 = 1 << 5;
const U2X: u8 = 1 << 1;
const MPCM: u8 = 1 << 0;

// UCSR0B
const RXEN: u8 = 1 << 4;
const TXEN: u8 = 1 << 3;

// UCSR0C: asynchronous, 8 data bits, no parity, 1 stop bit
const FRAME_8N1: u8 = 0x06;

/// USART0 without interrupts. Every status flag is polled.
pub struct Uart {
    _usart: PhantomData<USART0>,
}

impl Uart {
    pub fn new(ubrr: u16) -> Self {
        unsafe {
            let p = USART0::ptr();
            (*p).ubrr0h.write(|w| w.bits((ubrr >> 8) as u8));
            (*p).ubrr0l.write(|w| w.bits(ubrr as u8));
            (*p).ucsr0c.write(|w| w.bits(FRAME_8N1));
            (*p).ucsr0b.write(|w| w.bits(RXEN | TXEN));
        }

        Self {
            _usart: PhantomData,
        }
    }

    fn status(&self) -> u8 {
        unsafe { (*USART0::ptr()).ucsr0a.read().bits() }
    }
}

impl serial::Read<u8> for Uart {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        if self.status() & RXC == 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(unsafe { (*USART0::ptr()).udr0.read().bits() })
    }
}

impl serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if self.status() & UDRE == 0 {
            return Err(nb::Error::WouldBlock);
        }
        unsafe {
            (*USART0::ptr()).udr0.write(|w| w.bits(byte));
        }
        Ok(())
    }

    /// Completes once the last written byte has been shifted out.
    ///
    /// TXC does not clear itself without the TX-complete interrupt, so it is
    /// cleared here by writing it back as one. Only valid after a `write`.
    fn flush(&mut self) -> nb::Result<(), Infallible> {
        let status = self.status();
        if status & TXC == 0 {
            return Err(nb::Error::WouldBlock);
        }
        unsafe {
            (*USART0::ptr())
                .ucsr0a
                .write(|w| w.bits((status & (U2X | MPCM)) | TXC));
        }
        Ok(())
    }
}
