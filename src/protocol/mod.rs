//! Wire-level constants and the byte transport of the ISP protocol
//!
//! The protocol is unframed: commands, arguments and responses are raw bytes
//! with no start marker, checksum or escaping.

pub mod transport;

pub use transport::{SerialTransport, Transport};

/// Generic acknowledge.
pub const CR: u8 = b'\r';

/// Answer to unknown commands and memory spaces.
pub const UNKNOWN: u8 = b'?';

/// Positive answer to capability queries.
pub const YES: u8 = b'Y';

/// Programmer type reported by `p`: serial.
pub const PROGRAMMER_TYPE_SERIAL: u8 = b'S';

/// Terminates the device list sent for `t`.
pub const DEVICE_LIST_END: u8 = 0x00;
