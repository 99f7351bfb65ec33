//! Flash and EEPROM access as seen by the protocol engine

/// Self-programming interface of the target device.
///
/// All addresses are byte addresses. Flash programming follows the AVR
/// page-buffer model: words are staged with [`fill_word`](Device::fill_word)
/// and written together by [`commit_page`](Device::commit_page). Erase and
/// commit start an operation that [`wait_ready`](Device::wait_ready) waits
/// out; flash stays unreadable until
/// [`enable_read_access`](Device::enable_read_access) is called.
///
/// Failures are not reported. The protocol assumes every operation succeeds.
pub trait Device {
    fn erase_page(&mut self, addr: u16);

    /// Stage one little-endian word in the page buffer.
    fn fill_word(&mut self, addr: u16, word: u16);

    fn commit_page(&mut self, base: u16);

    /// Busy-wait until no flash operation is pending.
    fn wait_ready(&mut self);

    fn enable_read_access(&mut self);

    fn read_program_byte(&mut self, addr: u16) -> u8;

    fn read_eeprom_byte(&mut self, addr: u16) -> u8;

    fn write_eeprom_byte(&mut self, addr: u16, byte: u8);

    fn read_lock_bits(&mut self) -> u8;

    fn read_fuse_low(&mut self) -> u8;

    fn read_fuse_high(&mut self) -> u8;
}

