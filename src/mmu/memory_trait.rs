use crate::constants::{IE_ADDR, IF_ADDR};

/// Byte-addressable view of the 16-bit address space.
///
/// The CPU, the timer and the PPU only ever see memory through this trait,
/// which keeps them free of any ownership over each other.
pub trait Memory {
    fn read_byte(&self, addr: u16) -> u8;
    fn write_byte(&mut self, addr: u16, val: u8);

    /// Stores DIV without the reset side effect a software write has.
    fn write_divider(&mut self, val: u8);

    /// Returns true once after software wrote to DIV, then clears the latch.
    fn take_divider_reset(&mut self) -> bool {
        false
    }

    // Helper for 16-bit reads (Little Endian)
    fn read_u16(&self, addr: u16) -> u16 {
        let low = self.read_byte(addr) as u16;
        let high = self.read_byte(addr.wrapping_add(1)) as u16;
        (high << 8) | low
    }

    // Helper for 16-bit writes (Little Endian)
    fn write_u16(&mut self, addr: u16, val: u16) {
        self.write_byte(addr, (val & 0xFF) as u8);
        self.write_byte(addr.wrapping_add(1), (val >> 8) as u8);
    }

    fn read_ie(&self) -> u8 {
        self.read_byte(IE_ADDR)
    }

    fn read_if(&self) -> u8 {
        self.read_byte(IF_ADDR)
    }

    fn write_ie(&mut self, value: u8) {
        self.write_byte(IE_ADDR, value);
    }

    fn write_if(&mut self, value: u8) {
        self.write_byte(IF_ADDR, value);
    }

    /// Interrupts that are both requested and enabled.
    fn pending_interrupts(&self) -> u8 {
        self.read_if() & self.read_ie() & 0x1F
    }

    fn pending_interrupt(&self) -> bool {
        self.pending_interrupts() != 0
    }
}
