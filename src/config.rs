//! Configuration constants for the ATmega128 ISP bootloader

use core::fmt;

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate of the programming link
pub const UART_BAUD: u32 = 9600;

/// Baud rate of the USART1 diagnostic console
pub const DEBUG_BAUD: u32 = 115_200;

/// Baud rate register value for asynchronous normal mode, rounded to nearest.
pub const fn ubrr(baud: u32) -> u16 {
    ((CPU_FREQ_HZ + 8 * baud) / (16 * baud) - 1) as u16
}

/// UBRR value for `UART_BAUD` at `CPU_FREQ_HZ`
pub const UBRR: u16 = ubrr(UART_BAUD);

/// UBRR value for `DEBUG_BAUD`, U2X off
pub const DEBUG_UBRR: u16 = ubrr(DEBUG_BAUD);

/// Answer to `S`.
pub const PROGRAMMER_ID: [u8; 7] = *b"AVR 109";

/// Answer to `V`.
pub const SOFTWARE_VERSION: [u8; 2] = *b"10";

/// Answer to `v`.
pub const HARDWARE_VERSION: [u8; 2] = *b"10";

/// Highest byte address (exclusive) reachable with 16-bit addressing.
pub const ADDRESS_SPACE: u32 = 0x1_0000;

/// Per-device constants consumed by the protocol engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Flash page size in bytes.
    pub page_size: u16,
    /// Chip erase covers byte addresses `0..erase_limit`.
    pub erase_limit: u32,
    /// Signature bytes in datasheet order (`0x1E` first).
    pub signature: [u8; 3],
    /// AVR910 device code reported by `t`.
    pub device_code: u8,
}

/// ATmega128. Only the lower 64 KiB of flash is reachable without RAMPZ,
/// so chip erase stops there and never reaches the boot section.
pub const ATMEGA128: DeviceProfile = DeviceProfile {
    page_size: 256,
    erase_limit: ADDRESS_SPACE,
    signature: [0x1E, 0x97, 0x02],
    device_code: 0x44,
};

/// ATmega32 with a 2K word boot section at 0x7000.
pub const ATMEGA32: DeviceProfile = DeviceProfile {
    page_size: 128,
    erase_limit: 0x7000,
    signature: [0x1E, 0x95, 0x02],
    device_code: 0x73,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Page size is zero, odd or not a power of two.
    InvalidPageSize(u16),
    /// Erase limit is zero or not a whole number of pages.
    MisalignedEraseLimit(u32),
    /// Erase limit lies beyond the 16-bit address space.
    EraseLimitOutOfRange(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPageSize(size) => {
                write!(f, "invalid flash page size {}", size)
            }
            ConfigError::MisalignedEraseLimit(limit) => {
                write!(f, "erase limit {:#x} is not page aligned", limit)
            }
            ConfigError::EraseLimitOutOfRange(limit) => {
                write!(f, "erase limit {:#x} exceeds 16-bit addressing", limit)
            }
        }
    }
}

impl DeviceProfile {
    /// Check the profile against the limits of 16-bit page addressing.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size < 2 || !self.page_size.is_power_of_two() {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        if self.erase_limit > ADDRESS_SPACE {
            return Err(ConfigError::EraseLimitOutOfRange(self.erase_limit));
        }
        if self.erase_limit == 0 || self.erase_limit % self.page_size as u32 != 0 {
            return Err(ConfigError::MisalignedEraseLimit(self.erase_limit));
        }
        Ok(())
    }

    /// Number of pages touched by a chip erase.
    pub const fn erase_pages(&self) -> u32 {
        self.erase_limit / self.page_size as u32
    }
}

const _: () = assert!(ATMEGA128.validate().is_ok());
const _: () = assert!(ATMEGA32.validate().is_ok());
