use avr_device::atmega128a::{CPU, WDT};

// MCUCSR
const WDRF: u8 = 1 << 3;

// WDTCR
const WDCE: u8 = 1 << 4;
const WDE: u8 = 1 << 3;

pub struct Watchdog {
    _private: (),
}

impl Watchdog {
    #[inline]
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Stop a watchdog left running by the application or the fuses.
    ///
    /// A watchdog reset keeps the watchdog enabled, so WDRF has to be
    /// cleared before WDE can be.
    #[inline]
    pub fn disable(&mut self) {
        avr_device::interrupt::free(|_| unsafe {
            let cpu = &*CPU::ptr();
            cpu.mcucsr.modify(|r, w| w.bits(r.bits() & !WDRF));

            // Timed sequence to disable watchdog
            let p = WDT::ptr();
            (*p).wdtcr.write(|w| w.bits(WDCE | WDE));
            (*p).wdtcr.write(|w| w.bits(0x00));
        });
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}
