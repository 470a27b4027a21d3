use log::trace;

use crate::constants::*;
use crate::mmu::Memory;

/// Interrupt sources in priority order; the lowest bit wins.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    pub fn bit(self) -> u8 {
        match self {
            Interrupt::VBlank => 0x01,
            Interrupt::LcdStat => 0x02,
            Interrupt::Timer => 0x04,
            Interrupt::Serial => 0x08,
            Interrupt::Joypad => 0x10,
        }
    }

    pub fn vector(self) -> u16 {
        match self {
            Interrupt::VBlank => ADDR_VEC_VBLANK,
            Interrupt::LcdStat => ADDR_VEC_LCD_STAT,
            Interrupt::Timer => ADDR_VEC_TIMER,
            Interrupt::Serial => ADDR_VEC_SERIAL,
            Interrupt::Joypad => ADDR_VEC_JOYPAD,
        }
    }

    /// Highest priority source among the set bits of `pending`.
    pub fn highest_priority(pending: u8) -> Option<Interrupt> {
        Interrupt::ALL
            .into_iter()
            .find(|source| pending & source.bit() != 0)
    }
}

/// ORs the source bit into IF.
pub fn request_interrupt<M: Memory + ?Sized>(mem: &mut M, source: Interrupt) {
    trace!("request_interrupt: {:?}", source);
    let flags = mem.read_if();
    mem.write_if(flags | source.bit());
}
