#![no_std]
#![no_main]

use panic_halt as _;

use avr_isp_bootloader::{
    config,
    hal::{self, Nvm, Uart, Watchdog},
    Bootloader, BootloaderError, SelfProgramming, SerialTransport,
};

#[avr_device::entry]
fn main() -> ! {
    Watchdog::new().disable();

    #[cfg(feature = "debug")]
    {
        use avr_isp_bootloader::drivers::serial_console::{self, SerialConsole};

        let mut console = SerialConsole::new(config::DEBUG_UBRR);
        ufmt::uwriteln!(
            console,
            "ISP bootloader: page {} bytes, erase limit {}",
            config::ATMEGA128.page_size,
            config::ATMEGA128.erase_limit
        )
        .ok();
        if serial_console::init_logger(&console, log::LevelFilter::Trace).is_err() {
            ufmt::uwriteln!(console, "logger already installed").ok();
        }
    }

    let transport = SerialTransport::new(Uart::new(config::UBRR));
    let device = SelfProgramming::new(Nvm::new());
    let mut bootloader = match Bootloader::new(transport, device, config::ATMEGA128) {
        Ok(bootloader) => bootloader,
        Err(_) => loop {},
    };

    match bootloader.run() {
        Ok(()) => hal::start_application(),
        Err(BootloaderError::Transport(never)) => match never {},
    }
}
