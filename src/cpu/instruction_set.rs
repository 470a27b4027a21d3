use log::{trace, warn};

use crate::cpu::*;

impl Cpu {
    /// Executes a decoded instruction. Operand bytes are fetched here, so PC
    /// ends up past the full encoding. Returns the clock cycles consumed.
    pub fn execute(&mut self, instruction: Instruction, mem: &mut impl Memory) -> u32 {
        match instruction {
            Instruction::Nop => 4,
            Instruction::Prefix => {
                // fetch_instruction always resolves the prefix.
                warn!("Prefix byte executed on its own at {:#06X}", self.pc);
                4
            }
            Instruction::Illegal(opcode) => {
                warn!(
                    "Illegal opcode {:02X} at {:#06X}, treated as NOP",
                    opcode,
                    self.pc.wrapping_sub(1)
                );
                4
            }
            Instruction::Stop => {
                // STOP is a 2-byte instruction (0x10 00), the second byte is padding.
                self.fetch8(mem);
                self.halted = true;
                4
            }
            Instruction::Halt => self.halt(mem),
            Instruction::Di => {
                self.ime = false;
                self.ime_scheduled = 0;
                4
            }
            Instruction::Ei => {
                // Takes effect after the following instruction.
                if !self.ime && self.ime_scheduled == 0 {
                    self.ime_scheduled = 2;
                }
                4
            }

            Instruction::Ld { dest, src } => {
                let val = self.read_target(src, mem);
                self.write_target(dest, val, mem);
                4 + src.access_cycles() + dest.access_cycles()
            }
            Instruction::LdImm16(reg) => {
                let val = self.fetch16(mem);
                self.set_reg16(reg, val);
                12
            }
            Instruction::LdAddrSp => {
                let addr = self.fetch16(mem);
                mem.write_u16(addr, self.sp);
                20
            }
            Instruction::LdSpHl => {
                self.sp = self.get_reg16(Reg16::HL);
                8
            }
            Instruction::LdHlSpOffset => {
                let offset = self.fetch8(mem);
                let res = Alu16Output::add_sp_offset(self.sp, offset);
                self.set_reg16(Reg16::HL, res.value);
                self.flags = Flags::new(false, false, res.h, res.c);
                12
            }
            Instruction::Push(reg) => {
                let val = self.get_reg16(reg);
                self.push_u16(mem, val);
                16
            }
            Instruction::Pop(reg) => {
                // AF goes through Flags, which drops the low nibble of F.
                let val = self.pop_u16(mem);
                self.set_reg16(reg, val);
                12
            }

            Instruction::Alu(op, src) => {
                let val = self.read_target(src, mem);
                self.alu(op, val);
                4 + src.access_cycles()
            }
            Instruction::Inc(target) => {
                let val = self.read_target(target, mem);
                let res = AluOutput::alu_8bit_inc(val, self.flags.c);
                self.write_target(target, res.value, mem);
                self.flags = res.flags();
                4 + 2 * target.access_cycles()
            }
            Instruction::Dec(target) => {
                let val = self.read_target(target, mem);
                let res = AluOutput::alu_8bit_dec(val, self.flags.c);
                self.write_target(target, res.value, mem);
                self.flags = res.flags();
                4 + 2 * target.access_cycles()
            }
            Instruction::Inc16(reg) => {
                let val = self.get_reg16(reg);
                self.set_reg16(reg, val.wrapping_add(1));
                8
            }
            Instruction::Dec16(reg) => {
                let val = self.get_reg16(reg);
                self.set_reg16(reg, val.wrapping_sub(1));
                8
            }
            Instruction::AddHl(reg) => {
                let res = Alu16Output::add_hl(self.get_reg16(Reg16::HL), self.get_reg16(reg));
                self.set_reg16(Reg16::HL, res.value);
                // Z: Not affected!
                self.flags.n = false;
                self.flags.h = res.h;
                self.flags.c = res.c;
                8
            }
            Instruction::AddSpOffset => {
                let offset = self.fetch8(mem);
                let res = Alu16Output::add_sp_offset(self.sp, offset);
                self.sp = res.value;
                self.flags = Flags::new(false, false, res.h, res.c);
                16
            }

            // The accumulator rotates always clear Z.
            Instruction::Rlca => self.rotate_a(AluOutput::rlc(self.a)),
            Instruction::Rrca => self.rotate_a(AluOutput::rrc(self.a)),
            Instruction::Rla => self.rotate_a(AluOutput::rl(self.a, self.flags.c)),
            Instruction::Rra => self.rotate_a(AluOutput::rr(self.a, self.flags.c)),
            Instruction::Daa => {
                let res = AluOutput::daa(self.a, self.flags);
                self.a = res.value;
                self.flags = res.flags();
                4
            }
            Instruction::Cpl => {
                // Complement Accumulator (A = NOT A)
                self.a = !self.a;
                self.flags.n = true;
                self.flags.h = true;
                4
            }
            Instruction::Scf => {
                self.flags.n = false;
                self.flags.h = false;
                self.flags.c = true;
                4
            }
            Instruction::Ccf => {
                self.flags.n = false;
                self.flags.h = false;
                self.flags.c = !self.flags.c;
                4
            }

            Instruction::Jp(condition) => {
                let addr = self.fetch16(mem);
                if self.check_condition(condition) {
                    self.pc = addr;
                    16
                } else {
                    12
                }
            }
            Instruction::JpHl => {
                self.pc = self.get_reg16(Reg16::HL);
                4
            }
            Instruction::Jr(condition) => {
                let offset = self.fetch8(mem) as i8;
                if self.check_condition(condition) {
                    self.pc = self.pc.wrapping_add_signed(offset as i16);
                    12
                } else {
                    8
                }
            }
            Instruction::Call(condition) => {
                let addr = self.fetch16(mem);
                if self.check_condition(condition) {
                    self.push_u16(mem, self.pc);
                    self.pc = addr;
                    24
                } else {
                    12
                }
            }
            Instruction::Ret(None) => {
                self.pc = self.pop_u16(mem);
                16
            }
            Instruction::Ret(condition) => {
                if self.check_condition(condition) {
                    self.pc = self.pop_u16(mem);
                    20
                } else {
                    8
                }
            }
            Instruction::Reti => {
                self.pc = self.pop_u16(mem);
                self.ime = true;
                16
            }
            Instruction::Rst(vector) => {
                self.push_u16(mem, self.pc);
                self.pc = vector as u16;
                16
            }

            Instruction::Shift(op, target) => {
                let val = self.read_target(target, mem);
                let res = match op {
                    ShiftOp::Rlc => AluOutput::rlc(val),
                    ShiftOp::Rrc => AluOutput::rrc(val),
                    ShiftOp::Rl => AluOutput::rl(val, self.flags.c),
                    ShiftOp::Rr => AluOutput::rr(val, self.flags.c),
                    ShiftOp::Sla => AluOutput::sla(val),
                    ShiftOp::Sra => AluOutput::sra(val),
                    ShiftOp::Swap => AluOutput::swap(val),
                    ShiftOp::Srl => AluOutput::srl(val),
                };
                self.write_target(target, res.value, mem);
                self.flags = res.flags();
                8 + 2 * target.access_cycles()
            }
            Instruction::Bit(bit, target) => {
                let val = self.read_target(target, mem);
                self.flags.z = val & (1 << bit) == 0;
                self.flags.n = false;
                self.flags.h = true;
                // C flag is left unchanged
                8 + target.access_cycles()
            }
            Instruction::Res(bit, target) => {
                let val = self.read_target(target, mem);
                self.write_target(target, val & !(1 << bit), mem);
                8 + 2 * target.access_cycles()
            }
            Instruction::Set(bit, target) => {
                let val = self.read_target(target, mem);
                self.write_target(target, val | (1 << bit), mem);
                8 + 2 * target.access_cycles()
            }
        }
    }

    fn halt(&mut self, mem: &mut impl Memory) -> u32 {
        if !self.ime && mem.pending_interrupt() {
            trace!("cpu: HALT bug at {:#06X}", self.pc);
            self.halt_bug_triggered = true;
        } else {
            self.halted = true;
        }
        4
    }

    fn rotate_a(&mut self, res: AluOutput) -> u32 {
        self.a = res.value;
        self.flags = Flags::new(false, false, false, res.c);
        4
    }

    fn alu(&mut self, op: AluOp, val: u8) {
        let res = match op {
            AluOp::Add => AluOutput::alu_8bit_add(self.a, val, false),
            AluOp::Adc => AluOutput::alu_8bit_add(self.a, val, self.flags.c),
            AluOp::Sub | AluOp::Cp => AluOutput::alu_8bit_sub(self.a, val, false),
            AluOp::Sbc => AluOutput::alu_8bit_sub(self.a, val, self.flags.c),
            AluOp::And => AluOutput::alu_and(self.a, val),
            AluOp::Xor => AluOutput::alu_xor(self.a, val),
            AluOp::Or => AluOutput::alu_or(self.a, val),
        };
        // CP ONLY updates Flags (A remains unchanged)
        if op != AluOp::Cp {
            self.a = res.value;
        }
        self.flags = res.flags();
    }

    /// Reads the actual value for a given operand target.
    /// This may increment PC if it reads immediate values from memory.
    fn read_target(&mut self, target: Target, mem: &mut impl Memory) -> u8 {
        match target {
            Target::Register8(reg) => self.get_reg8(reg),
            Target::Immediate8 => self.fetch8(mem),
            Target::AddrImmediate16 => {
                let addr = self.fetch16(mem);
                mem.read_byte(addr)
            }
            // LDH (a8) - High RAM access (0xFF00 + immediate byte)
            Target::AddrImmediate8 => {
                let offset = self.fetch8(mem) as u16;
                mem.read_byte(0xFF00 | offset)
            }
            Target::AddrRegister8(reg) => mem.read_byte(0xFF00 | self.get_reg8(reg) as u16),
            Target::AddrRegister16(reg) => mem.read_byte(self.get_reg16(reg)),
            Target::AddrRegister16Increment(reg) => {
                let addr = self.get_reg16(reg);
                self.set_reg16(reg, addr.wrapping_add(1));
                mem.read_byte(addr)
            }
            Target::AddrRegister16Decrement(reg) => {
                let addr = self.get_reg16(reg);
                self.set_reg16(reg, addr.wrapping_sub(1));
                mem.read_byte(addr)
            }
        }
    }

    /// Stores into a target. Read-modify-write instructions always read the
    /// same target first, so address operands are never post-adjusted twice.
    fn write_target(&mut self, target: Target, value: u8, mem: &mut impl Memory) {
        match target {
            Target::Register8(reg) => self.set_reg8(reg, value),
            Target::Immediate8 => {
                warn!("Write to an immediate operand at {:#06X} ignored", self.pc);
            }
            Target::AddrImmediate16 => {
                let addr = self.fetch16(mem);
                mem.write_byte(addr, value);
            }
            Target::AddrImmediate8 => {
                let offset = self.fetch8(mem) as u16;
                mem.write_byte(0xFF00 | offset, value);
            }
            Target::AddrRegister8(reg) => {
                mem.write_byte(0xFF00 | self.get_reg8(reg) as u16, value)
            }
            Target::AddrRegister16(reg) => mem.write_byte(self.get_reg16(reg), value),
            Target::AddrRegister16Increment(reg) => {
                let addr = self.get_reg16(reg);
                self.set_reg16(reg, addr.wrapping_add(1));
                mem.write_byte(addr, value);
            }
            Target::AddrRegister16Decrement(reg) => {
                let addr = self.get_reg16(reg);
                self.set_reg16(reg, addr.wrapping_sub(1));
                mem.write_byte(addr, value);
            }
        }
    }
}
