//! NVM controller registers of the ATmega128
//!
//! `spm` only works from the boot section, which is where `build.rs` links
//! this code. Addresses are 16 bits wide and RAMPZ is never touched, so only
//! the lower 64 KiB of flash are reachable.

use core::arch::asm;
use core::ptr;

use avr_device::atmega128a::EEPROM;

use crate::drivers::self_programming::{NvmRegisters, BLBSET, SPMEN};

// SPMCSR lives in extended I/O space and needs sts/lds
const SPMCSR: u16 = 0x68;

// EECR, I/O address for sbi
const EECR_IO: u8 = 0x1C;
const EERE: u8 = 1 << 0;
const EEWE: u8 = 1 << 1;
const EEWE_BIT: u8 = 1;
const EEMWE_BIT: u8 = 2;

pub struct Nvm {
    _private: (),
}

impl Nvm {
    #[inline]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for Nvm {
    fn default() -> Self {
        Self::new()
    }
}

impl NvmRegisters for Nvm {
    fn spm_busy(&mut self) -> bool {
        unsafe { ptr::read_volatile(SPMCSR as *const u8) & SPMEN != 0 }
    }

    fn eeprom_busy(&mut self) -> bool {
        unsafe { (*EEPROM::ptr()).eecr.read().bits() & EEWE != 0 }
    }

    #[inline(always)]
    fn spm(&mut self, command: u8, addr: u16, data: u16) {
        unsafe {
            asm!(
                "movw r0, {data}",
                "sts {spmcsr}, {command}",
                "spm",
                "clr r1",
                spmcsr = const SPMCSR,
                data = in(reg_pair) data,
                command = in(reg) command,
                in("Z") addr,
            );
        }
    }

    fn lpm(&mut self, addr: u16) -> u8 {
        let value: u8;
        unsafe {
            asm!(
                "lpm {value}, Z",
                value = out(reg) value,
                in("Z") addr,
                options(readonly, nostack, preserves_flags),
            );
        }
        value
    }

    fn read_config(&mut self, z: u16) -> u8 {
        let value: u8;
        unsafe {
            asm!(
                "sts {spmcsr}, {command}",
                "lpm {value}, Z",
                spmcsr = const SPMCSR,
                command = in(reg) BLBSET | SPMEN,
                value = out(reg) value,
                in("Z") z,
            );
        }
        value
    }

    fn eeprom_read(&mut self, addr: u16) -> u8 {
        unsafe {
            let eeprom = &*EEPROM::ptr();
            eeprom.eear.write(|w| w.bits(addr));
            eeprom.eecr.write(|w| w.bits(EERE));
            eeprom.eedr.read().bits()
        }
    }

    fn eeprom_start_write(&mut self, addr: u16, byte: u8) {
        avr_device::interrupt::free(|_| unsafe {
            let eeprom = &*EEPROM::ptr();
            eeprom.eear.write(|w| w.bits(addr));
            eeprom.eedr.write(|w| w.bits(byte));
            // EEWE must follow EEMWE within four cycles
            asm!(
                "sbi {eecr}, {eemwe}",
                "sbi {eecr}, {eewe}",
                eecr = const EECR_IO,
                eemwe = const EEMWE_BIT,
                eewe = const EEWE_BIT,
            );
        });
    }
}
