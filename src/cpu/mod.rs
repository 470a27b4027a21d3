pub mod alu;
pub mod flags;
pub mod instruction_set;
pub mod snapshot;

use std::fmt;

use log::trace;

use crate::constants::*;
use crate::interrupts::Interrupt;
use crate::mmu::Memory;
use crate::opcodes::*;

pub use alu::{Alu16Output, AluOutput};
pub use flags::Flags;
pub use snapshot::CpuSnapshot;

/// Composes a register pair. The pair is a view, never separate storage.
pub fn pair_to_u16(low: u8, high: u8) -> u16 {
    u16::from_le_bytes([low, high])
}

/// Splits a 16-bit value into `(low, high)`.
pub fn u16_to_pair(value: u16) -> (u8, u8) {
    let [low, high] = value.to_le_bytes();
    (low, high)
}

#[derive(Debug, Clone)]
pub struct Cpu {
    // 8-bit Registers
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub flags: Flags,

    // 16-bit Special Registers
    pub pc: u16, // Program Counter
    pub sp: u16, // Stack Pointer

    // Internal state
    pub halted: bool,
    pub ime: bool, // Interrupt Master Enable
    // The interrupts are not enabled until the instruction after the EI instruction.
    // Counts down once per executed instruction, IME turns on when it reaches 0.
    pub ime_scheduled: u8,
    // HALT with IME off and an interrupt pending: the next opcode byte is read twice.
    pub halt_bug_triggered: bool,
    /// Clock cycles elapsed since power on.
    pub cycles: u64,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            // These values are standard for the GB after the boot ROM runs
            a: 0x01,
            flags: Flags::from_byte(0xB0),
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            pc: 0x0100, // Entry point for cartridges
            sp: 0xFFFE,
            halted: false,
            ime: false,
            ime_scheduled: 0,
            halt_bug_triggered: false,
            cycles: 0,
        }
    }

    /// Packed F register.
    pub fn f(&self) -> u8 {
        self.flags.to_byte()
    }

    /// Runs one instruction, or services one interrupt, or idles one
    /// machine cycle while halted. Returns the clock cycles consumed.
    pub fn step(&mut self, mem: &mut impl Memory) -> u32 {
        let cycles = self.step_inner(mem);
        self.cycles += cycles as u64;
        cycles
    }

    fn step_inner(&mut self, mem: &mut impl Memory) -> u32 {
        if self.halted {
            // Wakes on any requested and enabled source, whatever IME says.
            if !mem.pending_interrupt() {
                return 4;
            }
            trace!("cpu: leaving HALT");
            self.halted = false;
        }

        if let Some(cycles) = self.service_interrupt(mem) {
            return cycles;
        }

        let pc = self.pc;
        let instruction = self.fetch_instruction(mem);
        trace!("{:#06X}. {}", pc, instruction);
        let cycles = self.execute(instruction, mem);

        if self.ime_scheduled > 0 {
            self.ime_scheduled -= 1;
            if self.ime_scheduled == 0 {
                self.ime = true;
            }
        }
        cycles
    }

    /// Dispatches the highest priority pending interrupt when IME is set.
    fn service_interrupt(&mut self, mem: &mut impl Memory) -> Option<u32> {
        if !self.ime {
            return None;
        }
        let source = Interrupt::highest_priority(mem.pending_interrupts())?;
        trace!("cpu: servicing {:?} from {:#06X}", source, self.pc);

        let flags = mem.read_if();
        mem.write_if(flags & !source.bit());
        self.ime = false;
        self.ime_scheduled = 0;
        let mut return_pc = self.pc;
        if self.halt_bug_triggered {
            // EI; HALT with a request already pending: return to the HALT.
            self.halt_bug_triggered = false;
            return_pc = return_pc.wrapping_sub(1);
        }
        self.push_u16(mem, return_pc);
        self.pc = source.vector();
        Some(INTERRUPT_DISPATCH_CYCLES)
    }

    fn fetch_instruction(&mut self, mem: &mut impl Memory) -> Instruction {
        let opcode = mem.read_byte(self.pc);
        if self.halt_bug_triggered {
            // PC fails to advance past this opcode once.
            self.halt_bug_triggered = false;
        } else {
            self.pc = self.pc.wrapping_add(1);
        }

        match decode(opcode) {
            Instruction::Prefix => {
                debug_assert_eq!(opcode, CB_PREFIX_OPCODE_BYTE);
                let cb = self.fetch8(mem);
                decode_cb(cb)
            }
            instruction => instruction,
        }
    }

    pub fn fetch8(&mut self, mem: &impl Memory) -> u8 {
        let val = mem.read_byte(self.pc);
        self.pc = self.pc.wrapping_add(1);
        val
    }

    pub fn fetch16(&mut self, mem: &impl Memory) -> u16 {
        let val = mem.read_u16(self.pc);
        self.pc = self.pc.wrapping_add(2);
        val
    }

    pub fn get_reg16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => pair_to_u16(self.f(), self.a),
            Reg16::BC => pair_to_u16(self.c, self.b),
            Reg16::DE => pair_to_u16(self.e, self.d),
            Reg16::HL => pair_to_u16(self.l, self.h),
            Reg16::SP => self.sp,
        }
    }

    pub fn set_reg16(&mut self, reg: Reg16, val: u16) {
        let (low, high) = u16_to_pair(val);
        match reg {
            Reg16::AF => {
                self.a = high;
                // Note: The lower 4 bits of the F register are always 0 on Game Boy
                self.flags = Flags::from_byte(low);
            }
            Reg16::BC => {
                self.b = high;
                self.c = low;
            }
            Reg16::DE => {
                self.d = high;
                self.e = low;
            }
            Reg16::HL => {
                self.h = high;
                self.l = low;
            }
            Reg16::SP => self.sp = val,
        }
    }

    pub fn get_reg8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    pub fn set_reg8(&mut self, reg: Reg8, val: u8) {
        match reg {
            Reg8::A => self.a = val,
            Reg8::B => self.b = val,
            Reg8::C => self.c = val,
            Reg8::D => self.d = val,
            Reg8::E => self.e = val,
            Reg8::H => self.h = val,
            Reg8::L => self.l = val,
        }
    }

    /// Pushes a 16-bit value onto the stack
    pub fn push_u16(&mut self, mem: &mut impl Memory, value: u16) {
        let (low, high) = u16_to_pair(value);
        self.sp = self.sp.wrapping_sub(1);
        mem.write_byte(self.sp, high);
        self.sp = self.sp.wrapping_sub(1);
        mem.write_byte(self.sp, low);
    }

    pub fn pop_u16(&mut self, mem: &impl Memory) -> u16 {
        let low = mem.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        let high = mem.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        pair_to_u16(low, high)
    }

    pub fn check_condition(&self, condition: Option<Condition>) -> bool {
        match condition {
            None => true, // Unconditional jump
            Some(Condition::Zero) => self.flags.z,
            Some(Condition::NotZero) => !self.flags.z,
            Some(Condition::Carry) => self.flags.c,
            Some(Condition::NotCarry) => !self.flags.c,
        }
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A:{:02X} B:{:02X} C:{:02X} D:{:02X} E:{:02X} H:{:02X} L:{:02X} SP:{:04X} Flags:{}",
            self.a, self.b, self.c, self.d, self.e, self.h, self.l, self.sp, self.flags
        )
    }
}
