/*
Source: https://gbdev.io/pandocs/Memory_Map.html

The Game Boy has a 16-bit address bus, which is used to address ROM, RAM, and I/O.

Start	End	Description
0000	7FFF	Cartridge ROM
8000	9FFF	Video RAM (VRAM)
A000	BFFF	External RAM
C000	DFFF	Work RAM (WRAM)
E000	FDFF	Echo RAM
FE00	FE9F	Object attribute memory (OAM)
FEA0	FEFF	Not Usable
FF00	FF7F	I/O Registers
FF80	FFFE	High RAM (HRAM)
FFFF	FFFF	Interrupt Enable register (IE)

Storage is flat. Only a handful of I/O registers have write side effects.
*/

use log::{debug, trace};

use crate::constants::*;
use crate::input::{Button, Direction, Joypad};
use crate::interrupts::{Interrupt, request_interrupt};
use crate::mmu::memory_trait::Memory;

/// I/O register values left behind by the DMG boot ROM.
const POST_BOOT_IO: [(u16, u8); 16] = [
    (ADDR_SERIAL_SC, 0x7E),
    (ADDR_TIMER_DIV, 0xAB),
    (ADDR_TIMER_TAC, 0xF8),
    (IF_ADDR, 0xE1),
    (ADDR_PPU_LCDC, 0x91),
    (ADDR_PPU_STAT, 0x85),
    (ADDR_PPU_SCY, 0x00),
    (ADDR_PPU_SCX, 0x00),
    (ADDR_PPU_LY, 0x00),
    (ADDR_PPU_LYC, 0x00),
    (ADDR_PPU_DMA, 0xFF),
    (ADDR_PPU_BGP, 0xFC),
    (ADDR_PPU_OBP0, 0xFF),
    (ADDR_PPU_OBP1, 0xFF),
    (ADDR_PPU_WY, 0x00),
    (ADDR_PPU_WX, 0x00),
];

pub struct AddressSpace {
    // This puts exactly 64KB on the HEAP, not the STACK
    data: Box<[u8; MEMORY_SIZE]>,
    joypad: Joypad,
    divider_reset: bool,
    serial_output: Vec<u8>,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace {
    pub fn new() -> Self {
        let mut space = AddressSpace {
            data: Box::new([0u8; MEMORY_SIZE]),
            joypad: Joypad::new(),
            divider_reset: false,
            serial_output: Vec::new(),
        };
        for (addr, val) in POST_BOOT_IO {
            space.data[addr as usize] = val;
        }
        // Both select lines low, nothing pressed: reads 0xCF.
        space.write_byte(ADDR_JOYP, 0x00);
        space
    }

    /// Copies the ROM image verbatim starting at address 0.
    pub fn load_rom(&mut self, rom: &[u8]) {
        let copy_len = std::cmp::min(rom.len(), MEMORY_SIZE);
        self.data[..copy_len].copy_from_slice(&rom[..copy_len]);
        debug!(
            "Loading ROM, memory_size: {}, rom_size: {}, copy_len: {}",
            MEMORY_SIZE,
            rom.len(),
            copy_len
        );
    }

    /// Writes a run of bytes without triggering any register side effects.
    pub fn force_write_bytes(&mut self, addr: u16, bytes: &[u8]) {
        for (offset, byte) in bytes.iter().enumerate() {
            let target = addr.wrapping_add(offset as u16);
            self.data[target as usize] = *byte;
        }
    }

    pub fn force_write_byte(&mut self, addr: u16, val: u8) {
        self.data[addr as usize] = val;
    }

    /// Drains the bytes software sent through the serial port.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.serial_output)
    }

    pub fn serial_output(&self) -> &[u8] {
        &self.serial_output
    }

    pub fn set_button(&mut self, button: Button) {
        if self.joypad.set_button(button) {
            request_interrupt(self, Interrupt::Joypad);
        }
        self.refresh_joypad();
    }

    pub fn clear_button(&mut self, button: Button) {
        self.joypad.clear_button(button);
        self.refresh_joypad();
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.joypad.set_direction(direction) {
            request_interrupt(self, Interrupt::Joypad);
        }
        self.refresh_joypad();
    }

    pub fn clear_direction(&mut self, direction: Direction) {
        self.joypad.clear_direction(direction);
        self.refresh_joypad();
    }

    fn refresh_joypad(&mut self) {
        self.data[ADDR_JOYP as usize] = self.joypad.register();
    }

    fn dma_transfer(&mut self, val: u8) {
        // The value written is the high byte of the source (e.g., 0xC0 -> 0xC000)
        let source_base = (val as u16) << 8;
        for i in 0..OAM_SIZE {
            let byte = self.data[source_base.wrapping_add(i) as usize];
            self.data[(ADDR_OAM_START + i) as usize] = byte;
        }
    }
}

impl Memory for AddressSpace {
    fn read_byte(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        match addr {
            ADDR_JOYP => {
                trace!("write_byte [0x{:04X}] -> 0x{:02X} (JOYPAD SEL)", addr, val);
                self.joypad.write_select(val);
                self.refresh_joypad();
            }
            ADDR_TIMER_DIV => {
                trace!("write_byte [0x{:04X}] -> 0x{:02X} (DIV RESET)", addr, val);
                self.data[addr as usize] = 0;
                self.divider_reset = true;
            }
            ADDR_SERIAL_SC => {
                if val == 0x81 {
                    let byte = self.data[ADDR_SERIAL_SB as usize];
                    trace!(
                        "write_byte [0x{:04X}] -> 0x{:02X} (SERIAL LOG: '{}')",
                        addr, val, byte as char
                    );
                    self.serial_output.push(byte);
                }
                self.data[addr as usize] = val;
            }
            ADDR_PPU_DMA => {
                trace!("write_byte [0x{:04X}] -> 0x{:02X} (DMA)", addr, val);
                self.data[addr as usize] = val;
                self.dma_transfer(val);
            }
            _ => {
                self.data[addr as usize] = val;
            }
        }
    }

    fn write_divider(&mut self, val: u8) {
        self.data[ADDR_TIMER_DIV as usize] = val;
    }

    fn take_divider_reset(&mut self) -> bool {
        std::mem::take(&mut self.divider_reset)
    }
}
