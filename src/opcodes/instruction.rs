use std::fmt;

use super::*;

/// The eight accumulator operations of the 0x80-0xBF block and their
/// immediate forms.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// Rotates and shifts of the CB 0x00-0x3F block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }
}

/// A fully decoded instruction. Every one of the 256 base and 256
/// CB-prefixed encodings maps to exactly one variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    /// 0xCB, the second byte selects from the prefixed table.
    Prefix,
    /// Encodings with no hardware meaning, executed as a no-op.
    Illegal(u8),

    Ld { dest: Target, src: Target },
    LdImm16(Reg16),
    LdAddrSp,
    LdSpHl,
    LdHlSpOffset,
    Push(Reg16),
    Pop(Reg16),

    Alu(AluOp, Target),
    Inc(Target),
    Dec(Target),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    AddSpOffset,

    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,

    Jp(Option<Condition>),
    JpHl,
    Jr(Option<Condition>),
    Call(Option<Condition>),
    Ret(Option<Condition>),
    Reti,
    Rst(u8),

    Shift(ShiftOp, Target),
    Bit(u8, Target),
    Res(u8, Target),
    Set(u8, Target),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cond = |c: &Option<Condition>| match c {
            Some(c) => format!("{}, ", c),
            None => String::new(),
        };
        match self {
            Instruction::Nop => write!(f, "NOP"),
            Instruction::Stop => write!(f, "STOP"),
            Instruction::Halt => write!(f, "HALT"),
            Instruction::Di => write!(f, "DI"),
            Instruction::Ei => write!(f, "EI"),
            Instruction::Prefix => write!(f, "PREFIX"),
            Instruction::Illegal(op) => write!(f, "ILLEGAL_{:02X}", op),
            Instruction::Ld { dest, src } => write!(f, "LD {}, {}", dest, src),
            Instruction::LdImm16(reg) => write!(f, "LD {}, n16", reg),
            Instruction::LdAddrSp => write!(f, "LD (a16), SP"),
            Instruction::LdSpHl => write!(f, "LD SP, HL"),
            Instruction::LdHlSpOffset => write!(f, "LD HL, SP+e8"),
            Instruction::Push(reg) => write!(f, "PUSH {}", reg),
            Instruction::Pop(reg) => write!(f, "POP {}", reg),
            Instruction::Alu(op, src) => {
                write!(f, "{} A, {}", format!("{:?}", op).to_uppercase(), src)
            }
            Instruction::Inc(t) => write!(f, "INC {}", t),
            Instruction::Dec(t) => write!(f, "DEC {}", t),
            Instruction::Inc16(reg) => write!(f, "INC {}", reg),
            Instruction::Dec16(reg) => write!(f, "DEC {}", reg),
            Instruction::AddHl(reg) => write!(f, "ADD HL, {}", reg),
            Instruction::AddSpOffset => write!(f, "ADD SP, e8"),
            Instruction::Rlca => write!(f, "RLCA"),
            Instruction::Rrca => write!(f, "RRCA"),
            Instruction::Rla => write!(f, "RLA"),
            Instruction::Rra => write!(f, "RRA"),
            Instruction::Daa => write!(f, "DAA"),
            Instruction::Cpl => write!(f, "CPL"),
            Instruction::Scf => write!(f, "SCF"),
            Instruction::Ccf => write!(f, "CCF"),
            Instruction::Jp(c) => write!(f, "JP {}a16", cond(c)),
            Instruction::JpHl => write!(f, "JP HL"),
            Instruction::Jr(c) => write!(f, "JR {}e8", cond(c)),
            Instruction::Call(c) => write!(f, "CALL {}a16", cond(c)),
            Instruction::Ret(Some(c)) => write!(f, "RET {}", c),
            Instruction::Ret(None) => write!(f, "RET"),
            Instruction::Reti => write!(f, "RETI"),
            Instruction::Rst(vector) => write!(f, "RST ${:02X}", vector),
            Instruction::Shift(op, t) => {
                write!(f, "{} {}", format!("{:?}", op).to_uppercase(), t)
            }
            Instruction::Bit(bit, t) => write!(f, "BIT {}, {}", bit, t),
            Instruction::Res(bit, t) => write!(f, "RES {}, {}", bit, t),
            Instruction::Set(bit, t) => write!(f, "SET {}, {}", bit, t),
        }
    }
}
