//! ATmega128 hardware access used by the bootloader

pub mod spm;
pub mod uart;
pub mod watchdog;

pub use spm::Nvm;
pub use uart::Uart;
pub use watchdog::Watchdog;

use avr_device::atmega128a::CPU;

// MCUCR
const IVCE: u8 = 1 << 0;

/// Hand the CPU over to the application at address 0.
///
/// Interrupt vectors are moved back to the application section first.
pub fn start_application() -> ! {
    unsafe {
        let mcucr = &(*CPU::ptr()).mcucr;
        mcucr.write(|w| w.bits(IVCE));
        mcucr.write(|w| w.bits(0x00));

        core::arch::asm!("jmp 0", options(noreturn));
    }
}
