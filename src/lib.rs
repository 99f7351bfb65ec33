//! AVR109-style serial ISP bootloader for ATmega devices
//!
//! The protocol engine in [`bootloader`] is written against the
//! [`Transport`](protocol::Transport) and [`Device`](drivers::Device) traits
//! and runs on the host as well as on the target. The [`hal`] module with
//! the ATmega128 implementations only exists when building for AVR.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

pub mod bootloader;
pub mod config;
pub mod drivers;
pub mod protocol;

#[cfg(target_arch = "avr")]
pub mod hal;

pub use bootloader::{Bootloader, BootloaderError, Command, Control, EngineState, MemorySpace};
pub use config::{ConfigError, DeviceProfile};
pub use drivers::{Device, NvmRegisters, SelfProgramming};
pub use protocol::{SerialTransport, Transport};
