//! Flash self-programming on top of raw NVM controller access
//!
//! The controller refuses SPMCSR commands while an EEPROM write is in
//! progress, and a page-buffer load issued then is silently lost. Every
//! SPMCSR access below therefore waits for both EEPROM and SPM to go idle.

use super::Device;

// SPMCSR bits
pub const SPMEN: u8 = 1 << 0;
pub const PGERS: u8 = 1 << 1;
pub const PGWRT: u8 = 1 << 2;
pub const BLBSET: u8 = 1 << 3;
pub const RWWSRE: u8 = 1 << 4;

// Z pointer values for reading configuration bytes with BLBSET
pub const Z_FUSE_LOW: u16 = 0x0000;
pub const Z_LOCK_BITS: u16 = 0x0001;
pub const Z_FUSE_HIGH: u16 = 0x0003;

/// Register-level access to the NVM controller, one call per hardware action.
pub trait NvmRegisters {
    /// SPMEN still set.
    fn spm_busy(&mut self) -> bool;

    /// EEWE still set.
    fn eeprom_busy(&mut self) -> bool;

    /// Write `command` to SPMCSR and execute `spm` with Z = `addr` and
    /// r1:r0 = `data`.
    fn spm(&mut self, command: u8, addr: u16, data: u16);

    /// `lpm` from program memory.
    fn lpm(&mut self, addr: u16) -> u8;

    /// Set BLBSET | SPMEN and `lpm` a fuse or lock byte.
    fn read_config(&mut self, z: u16) -> u8;

    fn eeprom_read(&mut self, addr: u16) -> u8;

    /// Start an EEPROM write; returns while it is still in progress.
    fn eeprom_start_write(&mut self, addr: u16, byte: u8);
}

pub struct SelfProgramming<R> {
    regs: R,
}

impl<R: NvmRegisters> SelfProgramming<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    pub fn release(self) -> R {
        self.regs
    }

    fn wait_idle(&mut self) {
        while self.regs.eeprom_busy() {}
        while self.regs.spm_busy() {}
    }

    fn command(&mut self, command: u8, addr: u16, data: u16) {
        self.wait_idle();
        self.regs.spm(command, addr, data);
    }
}

impl<R: NvmRegisters> Device for SelfProgramming<R> {
    fn erase_page(&mut self, addr: u16) {
        self.command(PGERS | SPMEN, addr, 0);
    }

    fn fill_word(&mut self, addr: u16, word: u16) {
        self.command(SPMEN, addr, word);
    }

    fn commit_page(&mut self, base: u16) {
        self.command(PGWRT | SPMEN, base, 0);
    }

    fn wait_ready(&mut self) {
        while self.regs.spm_busy() {}
    }

    fn enable_read_access(&mut self) {
        self.command(RWWSRE | SPMEN, 0, 0);
    }

    fn read_program_byte(&mut self, addr: u16) -> u8 {
        self.regs.lpm(addr)
    }

    fn read_eeprom_byte(&mut self, addr: u16) -> u8 {
        while self.regs.eeprom_busy() {}
        self.regs.eeprom_read(addr)
    }

    fn write_eeprom_byte(&mut self, addr: u16, byte: u8) {
        // EEPROM writes may not start while SPM is busy either
        self.wait_idle();
        self.regs.eeprom_start_write(addr, byte);
    }

    fn read_lock_bits(&mut self) -> u8 {
        self.wait_idle();
        self.regs.read_config(Z_LOCK_BITS)
    }

    fn read_fuse_low(&mut self) -> u8 {
        self.wait_idle();
        self.regs.read_config(Z_FUSE_LOW)
    }

    fn read_fuse_high(&mut self) -> u8 {
        self.wait_idle();
        self.regs.read_config(Z_FUSE_HIGH)
    }
}
