use crate::{cpu::Cpu, mmu::Memory};

/// Register file plus the four bytes at PC, as printed by the trace log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
    pub pcmem: [u8; 4], // The 4 bytes at PC
}

impl CpuSnapshot {
    pub fn from_cpu(cpu: &Cpu, mem: &impl Memory) -> Self {
        CpuSnapshot {
            a: cpu.a,
            f: cpu.f(),
            b: cpu.b,
            c: cpu.c,
            d: cpu.d,
            e: cpu.e,
            h: cpu.h,
            l: cpu.l,
            sp: cpu.sp,
            pc: cpu.pc,
            // Plain reads, none of the side-effecting registers are touched here.
            pcmem: std::array::from_fn(|i| mem.read_byte(cpu.pc.wrapping_add(i as u16))),
        }
    }

    /// One line in the Game Boy Doctor log format.
    pub fn to_doctor_string(&self) -> String {
        format!(
            "A:{:02X} F:{:02X} B:{:02X} C:{:02X} D:{:02X} E:{:02X} H:{:02X} L:{:02X} SP:{:04X} PC:{:04X} PCMEM:{:02X},{:02X},{:02X},{:02X}",
            self.a,
            self.f,
            self.b,
            self.c,
            self.d,
            self.e,
            self.h,
            self.l,
            self.sp,
            self.pc,
            self.pcmem[0],
            self.pcmem[1],
            self.pcmem[2],
            self.pcmem[3]
        )
    }
}
