#![allow(dead_code)]

use std::collections::VecDeque;

use avr_isp_bootloader::{Bootloader, BootloaderError, Control, Device, DeviceProfile, Transport};

pub const FLASH_BYTES: usize = 0x1_0000;
pub const EEPROM_BYTES: usize = 0x1000;

pub const LOCK_BITS: u8 = 0xEF;
pub const FUSE_LOW: u8 = 0xBF;
pub const FUSE_HIGH: u8 = 0xC8;

/// The script ran out: on hardware the engine would be blocked in a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted;

/// Transport fed from a byte script, recording everything sent.
#[derive(Default)]
pub struct ScriptedTransport {
    input: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl ScriptedTransport {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    pub fn pending(&self) -> usize {
        self.input.len()
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}

impl Transport for ScriptedTransport {
    type Error = Exhausted;

    fn read_byte(&mut self) -> Result<u8, Exhausted> {
        self.input.pop_front().ok_or(Exhausted)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Exhausted> {
        self.output.push(byte);
        Ok(())
    }
}

/// Device operations that change state, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    ErasePage(u16),
    FillWord(u16, u16),
    CommitPage(u16),
    WaitReady,
    EnableReadAccess,
    WriteEeprom(u16, u8),
}

/// Memory model of an AVR with a page buffer, logging every mutation.
pub struct RecordingDevice {
    page_size: u16,
    page_buffer: Vec<u8>,
    pub flash: Vec<u8>,
    pub eeprom: Vec<u8>,
    pub ops: Vec<Op>,
    pub program_reads: Vec<u16>,
    pub eeprom_reads: Vec<u16>,
}

impl RecordingDevice {
    pub fn new(page_size: u16) -> Self {
        Self {
            page_size,
            page_buffer: vec![0xFF; page_size as usize],
            flash: (0..FLASH_BYTES).map(|i| i as u8).collect(),
            eeprom: (0..EEPROM_BYTES).map(|i| (i as u8) ^ 0xA5).collect(),
            ops: Vec::new(),
            program_reads: Vec::new(),
            eeprom_reads: Vec::new(),
        }
    }

    fn page_start(&self, addr: u16) -> usize {
        (addr & !(self.page_size - 1)) as usize
    }

    fn page_offset(&self, addr: u16) -> usize {
        (addr & (self.page_size - 1)) as usize
    }

    pub fn flash_ops(&self) -> Vec<Op> {
        self.ops
            .iter()
            .copied()
            .filter(|op| !matches!(op, Op::WriteEeprom(..)))
            .collect()
    }
}

impl Device for RecordingDevice {
    fn erase_page(&mut self, addr: u16) {
        self.ops.push(Op::ErasePage(addr));
        let start = self.page_start(addr);
        self.flash[start..start + self.page_size as usize].fill(0xFF);
    }

    fn fill_word(&mut self, addr: u16, word: u16) {
        self.ops.push(Op::FillWord(addr, word));
        let offset = self.page_offset(addr);
        let [lo, hi] = word.to_le_bytes();
        self.page_buffer[offset] = lo;
        self.page_buffer[offset + 1] = hi;
    }

    fn commit_page(&mut self, base: u16) {
        self.ops.push(Op::CommitPage(base));
        let start = self.page_start(base);
        self.flash[start..start + self.page_size as usize].copy_from_slice(&self.page_buffer);
        self.page_buffer.fill(0xFF);
    }

    fn wait_ready(&mut self) {
        self.ops.push(Op::WaitReady);
    }

    fn enable_read_access(&mut self) {
        self.ops.push(Op::EnableReadAccess);
    }

    fn read_program_byte(&mut self, addr: u16) -> u8 {
        self.program_reads.push(addr);
        self.flash[addr as usize]
    }

    fn read_eeprom_byte(&mut self, addr: u16) -> u8 {
        self.eeprom_reads.push(addr);
        self.eeprom[addr as usize % EEPROM_BYTES]
    }

    fn write_eeprom_byte(&mut self, addr: u16, byte: u8) {
        self.ops.push(Op::WriteEeprom(addr, byte));
        self.eeprom[addr as usize % EEPROM_BYTES] = byte;
    }

    fn read_lock_bits(&mut self) -> u8 {
        LOCK_BITS
    }

    fn read_fuse_low(&mut self) -> u8 {
        FUSE_LOW
    }

    fn read_fuse_high(&mut self) -> u8 {
        FUSE_HIGH
    }
}

pub type TestBootloader = Bootloader<ScriptedTransport, RecordingDevice>;

pub fn bootloader(profile: DeviceProfile, input: &[u8]) -> TestBootloader {
    Bootloader::new(
        ScriptedTransport::new(input),
        RecordingDevice::new(profile.page_size),
        profile,
    )
    .expect("profile should be valid")
}

/// How a scripted session ended.
#[derive(Debug, PartialEq, Eq)]
pub struct Outcome {
    pub commands: usize,
    pub started_application: bool,
}

/// Execute commands until the script runs dry or the host sends `E`.
pub fn run_script(bootloader: &mut TestBootloader) -> Outcome {
    let mut commands = 0;
    loop {
        match bootloader.step() {
            Ok(Control::Continue) => commands += 1,
            Ok(Control::StartApplication) => {
                return Outcome {
                    commands: commands + 1,
                    started_application: true,
                }
            }
            Err(BootloaderError::Transport(Exhausted)) => {
                return Outcome {
                    commands,
                    started_application: false,
                }
            }
        }
    }
}

/// Send one command and return exactly what came back.
pub fn exchange(bootloader: &mut TestBootloader, input: &[u8]) -> Vec<u8> {
    bootloader.transport_mut().push(input);
    let control = bootloader.step().expect("command should complete");
    assert_eq!(control, Control::Continue);
    assert_eq!(bootloader.transport().pending(), 0, "command left input unread");
    bootloader.transport_mut().take_output()
}
