//! Command and memory-space decoding

/// One protocol command, decoded from its command byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `A`: load the address register.
    SetAddress,
    /// `a`: autoincrement support query.
    AutoIncrement,
    /// `E`: leave the bootloader and start the application.
    Exit,
    /// `e`: erase the application area.
    ChipErase,
    /// `b`: block mode support and page size query.
    BlockSupport,
    /// `B`: block write.
    BlockWrite,
    /// `g`: block read.
    BlockRead,
    /// `S`: programmer identifier.
    ProgrammerId,
    /// `V`: software version.
    SoftwareVersion,
    /// `v`: hardware version.
    HardwareVersion,
    /// `p`: programmer type.
    ProgrammerType,
    /// `t`: supported device codes.
    DeviceList,
    /// `P`: enter programming mode.
    EnterProgramming,
    /// `L`: leave programming mode.
    LeaveProgramming,
    /// `x`: set LED.
    SetLed,
    /// `y`: clear LED.
    ClearLed,
    /// `T`: select device type.
    SelectDevice,
    /// `s`: signature bytes.
    Signature,
    /// `r`: lock bits.
    LockBits,
    /// `F`: low fuse.
    FuseLow,
    /// `N`: high fuse.
    FuseHigh,
    /// `\0`: line noise, ignored.
    Idle,
    Unknown(u8),
}

impl Command {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'A' => Command::SetAddress,
            b'a' => Command::AutoIncrement,
            b'E' => Command::Exit,
            b'e' => Command::ChipErase,
            b'b' => Command::BlockSupport,
            b'B' => Command::BlockWrite,
            b'g' => Command::BlockRead,
            b'S' => Command::ProgrammerId,
            b'V' => Command::SoftwareVersion,
            b'v' => Command::HardwareVersion,
            b'p' => Command::ProgrammerType,
            b't' => Command::DeviceList,
            b'P' => Command::EnterProgramming,
            b'L' => Command::LeaveProgramming,
            b'x' => Command::SetLed,
            b'y' => Command::ClearLed,
            b'T' => Command::SelectDevice,
            b's' => Command::Signature,
            b'r' => Command::LockBits,
            b'F' => Command::FuseLow,
            b'N' => Command::FuseHigh,
            0x00 => Command::Idle,
            other => Command::Unknown(other),
        }
    }
}

/// Memory space selector of a block command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemorySpace {
    Flash,
    Eeprom,
}

impl MemorySpace {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'F' => Some(MemorySpace::Flash),
            b'E' => Some(MemorySpace::Eeprom),
            _ => None,
        }
    }
}
