use std::env;

// Byte address of the ATmega128 boot section with BOOTSZ = 00 (4K words).
const BOOT_SECTION_START: u32 = 0x1E000;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds only run the protocol tests
    if env::var("CARGO_CFG_TARGET_ARCH").map_or(true, |arch| arch != "avr") {
        return;
    }

    println!("cargo:rustc-link-arg=-mmcu=atmega128");

    // The bootloader must live in the boot section to be allowed to run SPM
    println!(
        "cargo:rustc-link-arg=-Wl,--section-start=.text={:#x}",
        BOOT_SECTION_START
    );

    println!("cargo:warning=Building ISP bootloader for ATmega128 at {:#x}", BOOT_SECTION_START);
}
