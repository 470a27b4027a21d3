#![allow(dead_code)]

use dmg_core::constants::*;
use dmg_core::cpu::Cpu;
use dmg_core::emulator::Emulator;
use dmg_core::mmu::{AddressSpace, Memory};

pub const PROGRAM_START: u16 = 0x0100;

/// Post-boot CPU and memory with `program` placed at the entry point and no
/// interrupt requested.
pub fn setup(program: &[u8]) -> (Cpu, AddressSpace) {
    // RUST_LOG=trace cargo test -- --nocapture
    let _ = env_logger::builder().is_test(true).try_init();
    let mut mem = AddressSpace::new();
    mem.force_write_bytes(PROGRAM_START, program);
    mem.write_if(0x00);
    (Cpu::new(), mem)
}

pub fn emulator_with_program(program: &[u8]) -> Emulator {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut emu = Emulator::new();
    emu.memory.force_write_bytes(PROGRAM_START, program);
    emu.memory.write_if(0x00);
    emu
}

/// Fills all eight rows of a tile with the same pair of bit planes.
pub fn write_tile(mem: &mut impl Memory, addr: u16, low: u8, high: u8) {
    for row in 0..8 {
        mem.write_byte(addr + row * 2, low);
        mem.write_byte(addr + row * 2 + 1, high);
    }
}

/// Identity palette, color index n is drawn with shade n.
pub fn identity_palettes(mem: &mut impl Memory) {
    mem.write_byte(ADDR_PPU_BGP, 0xE4);
    mem.write_byte(ADDR_PPU_OBP0, 0xE4);
    mem.write_byte(ADDR_PPU_OBP1, 0xE4);
}

pub fn pixel(buffer: &[u8], x: usize, y: usize) -> u8 {
    buffer[y * SCREEN_WIDTH + x]
}
