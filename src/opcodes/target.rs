use std::fmt;

use super::*;

/// Location of an 8-bit operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Target {
    Register8(Reg8),
    Immediate8,
    AddrImmediate16,                // (a16)
    AddrImmediate8,                 // for LDH (a8)
    AddrRegister8(Reg8),            // (C)
    AddrRegister16(Reg16),          // This is for (HL), (BC), (DE)
    AddrRegister16Decrement(Reg16), // (HL-)
    AddrRegister16Increment(Reg16), // (HL+)
}

impl Target {
    /// Operand column of the regular opcode blocks: B C D E H L (HL) A.
    pub fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => Target::Register8(Reg8::B),
            1 => Target::Register8(Reg8::C),
            2 => Target::Register8(Reg8::D),
            3 => Target::Register8(Reg8::E),
            4 => Target::Register8(Reg8::H),
            5 => Target::Register8(Reg8::L),
            6 => Target::AddrRegister16(Reg16::HL),
            _ => Target::Register8(Reg8::A),
        }
    }

    /// Clock cycles spent fetching operand bytes and touching memory for one access.
    pub fn access_cycles(&self) -> u32 {
        match self {
            Target::Register8(_) => 0,
            Target::Immediate8
            | Target::AddrRegister8(_)
            | Target::AddrRegister16(_)
            | Target::AddrRegister16Decrement(_)
            | Target::AddrRegister16Increment(_) => 4,
            Target::AddrImmediate8 => 8,
            Target::AddrImmediate16 => 12,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Register8(reg) => write!(f, "{}", reg),
            Target::Immediate8 => write!(f, "n8"),
            Target::AddrImmediate16 => write!(f, "(a16)"),
            Target::AddrImmediate8 => write!(f, "(a8)"),
            Target::AddrRegister8(reg) => write!(f, "({})", reg),
            Target::AddrRegister16(reg) => write!(f, "({})", reg),
            Target::AddrRegister16Decrement(reg) => write!(f, "({}-)", reg),
            Target::AddrRegister16Increment(reg) => write!(f, "({}+)", reg),
        }
    }
}
