pub mod device;
pub mod self_programming;

#[cfg(all(target_arch = "avr", feature = "debug"))]
pub mod serial_console;

pub use device::Device;
pub use self_programming::{NvmRegisters, SelfProgramming};

#[cfg(all(target_arch = "avr", feature = "debug"))]
pub use serial_console::SerialConsole;
