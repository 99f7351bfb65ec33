//! AVR109-style ISP protocol engine
//!
//! The engine reads one command byte at a time from a [`Transport`], reads
//! the command's arguments, drives the [`Device`] and answers. Apart from
//! the address register nothing survives from one command to the next.
//!
//! There is no timeout anywhere: a host that stops halfway through an
//! argument sequence leaves the engine waiting inside `read_byte` until the
//! device is reset.

pub mod command;

use core::fmt;

use log::{debug, trace, warn};

pub use command::{Command, MemorySpace};

use crate::config::{self, ConfigError, DeviceProfile};
use crate::drivers::Device;
use crate::protocol::{self, Transport};

/// Mutable protocol state owned by one engine instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineState {
    /// Word address for flash, byte address for EEPROM.
    pub address: u16,
}

/// What the caller should do after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// The host sent `E`; control goes to the application at address 0.
    StartApplication,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BootloaderError<E> {
    /// The transport failed. Hardware transports never do.
    Transport(E),
}

impl<E: fmt::Debug> fmt::Display for BootloaderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootloaderError::Transport(err) => write!(f, "transport error: {:?}", err),
        }
    }
}

pub type Result<T, E> = core::result::Result<T, BootloaderError<E>>;

pub struct Bootloader<T, D> {
    transport: T,
    device: D,
    profile: DeviceProfile,
    state: EngineState,
}

impl<T: Transport, D: Device> Bootloader<T, D> {
    /// Fails if `profile` would make erase or page arithmetic misbehave.
    pub fn new(
        transport: T,
        device: D,
        profile: DeviceProfile,
    ) -> core::result::Result<Self, ConfigError> {
        profile.validate()?;
        Ok(Self {
            transport,
            device,
            profile,
            state: EngineState::default(),
        })
    }

    pub fn address(&self) -> u16 {
        self.state.address
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_parts(self) -> (T, D) {
        (self.transport, self.device)
    }

    /// Serve commands until the host asks to start the application.
    pub fn run(&mut self) -> Result<(), T::Error> {
        loop {
            if self.step()? == Control::StartApplication {
                return Ok(());
            }
        }
    }

    /// Read and execute exactly one command.
    pub fn step(&mut self) -> Result<Control, T::Error> {
        let byte = self.recv()?;
        let command = Command::from_byte(byte);
        trace!("{:?}", command);

        match command {
            Command::SetAddress => {
                let hi = self.recv()?;
                let lo = self.recv()?;
                self.state.address = u16::from_be_bytes([hi, lo]);
                self.send(protocol::CR)?;
            }
            Command::AutoIncrement => self.send(protocol::YES)?,
            Command::Exit => return self.exit(),
            Command::ChipErase => self.chip_erase()?,
            Command::BlockSupport => {
                let [hi, lo] = self.profile.page_size.to_be_bytes();
                self.send_all(&[protocol::YES, hi, lo])?;
            }
            Command::BlockWrite => self.block_write()?,
            Command::BlockRead => self.block_read()?,
            Command::ProgrammerId => self.send_all(&config::PROGRAMMER_ID)?,
            Command::SoftwareVersion => self.send_all(&config::SOFTWARE_VERSION)?,
            Command::HardwareVersion => self.send_all(&config::HARDWARE_VERSION)?,
            Command::ProgrammerType => self.send(protocol::PROGRAMMER_TYPE_SERIAL)?,
            Command::DeviceList => {
                let code = self.profile.device_code;
                self.send_all(&[code, protocol::DEVICE_LIST_END])?;
            }
            Command::EnterProgramming | Command::LeaveProgramming => self.send(protocol::CR)?,
            Command::SetLed | Command::ClearLed | Command::SelectDevice => {
                self.recv()?;
                self.send(protocol::CR)?;
            }
            Command::Signature => {
                let [sig0, sig1, sig2] = self.profile.signature;
                self.send_all(&[sig2, sig1, sig0])?;
            }
            Command::LockBits => {
                let bits = self.device.read_lock_bits();
                self.send(bits)?;
            }
            Command::FuseLow => {
                let fuse = self.device.read_fuse_low();
                self.send(fuse)?;
            }
            Command::FuseHigh => {
                let fuse = self.device.read_fuse_high();
                self.send(fuse)?;
            }
            Command::Idle => {}
            Command::Unknown(byte) => {
                warn!("unknown command {:#04x}", byte);
                self.send(protocol::UNKNOWN)?;
            }
        }

        Ok(Control::Continue)
    }

    fn exit(&mut self) -> Result<Control, T::Error> {
        self.device.wait_ready();
        self.device.enable_read_access();
        self.send(protocol::CR)?;
        debug!("leaving bootloader");
        Ok(Control::StartApplication)
    }

    fn chip_erase(&mut self) -> Result<(), T::Error> {
        debug!("erasing {} pages", self.profile.erase_pages());
        let page_size = u32::from(self.profile.page_size);
        let mut addr = 0u32;
        while addr < self.profile.erase_limit {
            self.device.erase_page(addr as u16);
            self.device.wait_ready();
            addr += page_size;
        }
        self.device.enable_read_access();
        self.send(protocol::CR)
    }

    fn block_write(&mut self) -> Result<(), T::Error> {
        let len = self.recv_u16()?;
        let space = self.recv()?;
        match MemorySpace::from_byte(space) {
            Some(MemorySpace::Flash) => self.write_flash_block(len),
            Some(MemorySpace::Eeprom) => self.write_eeprom_block(len),
            None => {
                warn!("block write to unknown memory {:#04x}", space);
                self.send(protocol::UNKNOWN)
            }
        }
    }

    fn write_flash_block(&mut self, len: u16) -> Result<(), T::Error> {
        if len == 0 {
            return self.send(protocol::CR);
        }

        let base = self.state.address << 1;
        let mut addr = base;
        let mut remaining = len;
        while remaining > 0 {
            let lo = self.recv()?;
            // An odd trailing byte pairs with erased flash
            let hi = if remaining > 1 { self.recv()? } else { 0xFF };
            self.device.fill_word(addr, u16::from_le_bytes([lo, hi]));
            addr = addr.wrapping_add(2);
            remaining = remaining.saturating_sub(2);
        }

        debug!("commit page {:#06x}", base);
        self.device.commit_page(base);
        self.device.wait_ready();
        self.device.enable_read_access();
        self.state.address = self.state.address.wrapping_add(len / 2);
        self.send(protocol::CR)
    }

    fn write_eeprom_block(&mut self, len: u16) -> Result<(), T::Error> {
        for _ in 0..len {
            let byte = self.recv()?;
            self.device.write_eeprom_byte(self.state.address, byte);
            self.state.address = self.state.address.wrapping_add(1);
        }
        self.send(protocol::CR)
    }

    fn block_read(&mut self) -> Result<(), T::Error> {
        let len = self.recv_u16()?;
        let space = self.recv()?;
        match MemorySpace::from_byte(space) {
            Some(MemorySpace::Flash) => {
                // Flash reads leave the address register where it was
                let mut addr = self.state.address << 1;
                for _ in 0..len {
                    let byte = self.device.read_program_byte(addr);
                    self.send(byte)?;
                    addr = addr.wrapping_add(1);
                }
                Ok(())
            }
            Some(MemorySpace::Eeprom) => {
                for _ in 0..len {
                    let byte = self.device.read_eeprom_byte(self.state.address);
                    self.send(byte)?;
                    self.state.address = self.state.address.wrapping_add(1);
                }
                Ok(())
            }
            None => {
                warn!("block read from unknown memory {:#04x}", space);
                self.send(protocol::UNKNOWN)
            }
        }
    }

    fn recv(&mut self) -> Result<u8, T::Error> {
        self.transport.read_byte().map_err(BootloaderError::Transport)
    }

    fn recv_u16(&mut self) -> Result<u16, T::Error> {
        let hi = self.recv()?;
        let lo = self.recv()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn send(&mut self, byte: u8) -> Result<(), T::Error> {
        self.transport.write_byte(byte).map_err(BootloaderError::Transport)
    }

    fn send_all(&mut self, bytes: &[u8]) -> Result<(), T::Error> {
        self.transport.write_all(bytes).map_err(BootloaderError::Transport)
    }
}
