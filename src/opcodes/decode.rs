//! Opcode tables. An opcode byte is split into the fields
//! `xx yyy zzz` (with `yyy` = `ppq`), which index the regular blocks.

use super::*;

fn rp(p: u8) -> Reg16 {
    match p & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::SP,
    }
}

// Register pairs as seen by PUSH/POP.
fn rp2(p: u8) -> Reg16 {
    match p & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::AF,
    }
}

fn cc(y: u8) -> Condition {
    match y & 0x03 {
        0 => Condition::NotZero,
        1 => Condition::Zero,
        2 => Condition::NotCarry,
        _ => Condition::Carry,
    }
}

const A: Target = Target::Register8(Reg8::A);

/// Decodes a base-table opcode.
pub fn decode(opcode: u8) -> Instruction {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    match (x, z) {
        (0, 0) => match y {
            0 => Instruction::Nop,
            1 => Instruction::LdAddrSp,
            2 => Instruction::Stop,
            3 => Instruction::Jr(None),
            _ => Instruction::Jr(Some(cc(y - 4))),
        },
        (0, 1) if q == 0 => Instruction::LdImm16(rp(p)),
        (0, 1) => Instruction::AddHl(rp(p)),
        (0, 2) => {
            let mem = match p {
                0 => Target::AddrRegister16(Reg16::BC),
                1 => Target::AddrRegister16(Reg16::DE),
                2 => Target::AddrRegister16Increment(Reg16::HL),
                _ => Target::AddrRegister16Decrement(Reg16::HL),
            };
            if q == 0 {
                Instruction::Ld { dest: mem, src: A }
            } else {
                Instruction::Ld { dest: A, src: mem }
            }
        }
        (0, 3) if q == 0 => Instruction::Inc16(rp(p)),
        (0, 3) => Instruction::Dec16(rp(p)),
        (0, 4) => Instruction::Inc(Target::from_index(y)),
        (0, 5) => Instruction::Dec(Target::from_index(y)),
        (0, 6) => Instruction::Ld {
            dest: Target::from_index(y),
            src: Target::Immediate8,
        },
        (0, _) => match y {
            0 => Instruction::Rlca,
            1 => Instruction::Rrca,
            2 => Instruction::Rla,
            3 => Instruction::Rra,
            4 => Instruction::Daa,
            5 => Instruction::Cpl,
            6 => Instruction::Scf,
            _ => Instruction::Ccf,
        },

        // LD (HL),(HL) is the HALT slot.
        (1, 6) if y == 6 => Instruction::Halt,
        (1, _) => Instruction::Ld {
            dest: Target::from_index(y),
            src: Target::from_index(z),
        },

        (2, _) => Instruction::Alu(AluOp::from_index(y), Target::from_index(z)),

        (3, 0) => match y {
            0..=3 => Instruction::Ret(Some(cc(y))),
            4 => Instruction::Ld {
                dest: Target::AddrImmediate8,
                src: A,
            },
            5 => Instruction::AddSpOffset,
            6 => Instruction::Ld {
                dest: A,
                src: Target::AddrImmediate8,
            },
            _ => Instruction::LdHlSpOffset,
        },
        (3, 1) if q == 0 => Instruction::Pop(rp2(p)),
        (3, 1) => match p {
            0 => Instruction::Ret(None),
            1 => Instruction::Reti,
            2 => Instruction::JpHl,
            _ => Instruction::LdSpHl,
        },
        (3, 2) => match y {
            0..=3 => Instruction::Jp(Some(cc(y))),
            4 => Instruction::Ld {
                dest: Target::AddrRegister8(Reg8::C),
                src: A,
            },
            5 => Instruction::Ld {
                dest: Target::AddrImmediate16,
                src: A,
            },
            6 => Instruction::Ld {
                dest: A,
                src: Target::AddrRegister8(Reg8::C),
            },
            _ => Instruction::Ld {
                dest: A,
                src: Target::AddrImmediate16,
            },
        },
        (3, 3) => match y {
            0 => Instruction::Jp(None),
            1 => Instruction::Prefix,
            6 => Instruction::Di,
            7 => Instruction::Ei,
            _ => Instruction::Illegal(opcode),
        },
        (3, 4) if y < 4 => Instruction::Call(Some(cc(y))),
        (3, 4) => Instruction::Illegal(opcode),
        (3, 5) if q == 0 => Instruction::Push(rp2(p)),
        (3, 5) if p == 0 => Instruction::Call(None),
        (3, 5) => Instruction::Illegal(opcode),
        (3, 6) => Instruction::Alu(AluOp::from_index(y), Target::Immediate8),
        _ => Instruction::Rst(y * 8),
    }
}

/// Decodes the byte following a 0xCB prefix.
pub fn decode_cb(opcode: u8) -> Instruction {
    let y = (opcode >> 3) & 0x07;
    let target = Target::from_index(opcode);
    match opcode >> 6 {
        0 => Instruction::Shift(ShiftOp::from_index(y), target),
        1 => Instruction::Bit(y, target),
        2 => Instruction::Res(y, target),
        _ => Instruction::Set(y, target),
    }
}
