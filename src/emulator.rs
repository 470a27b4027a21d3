use log::{debug, trace};

use crate::cpu::{Cpu, CpuSnapshot};
use crate::input::{Button, Direction};
use crate::mmu::{AddressSpace, Memory};
use crate::ppu::Ppu;
use crate::timer::Timer;

/// Owns every component and moves them forward in lock step.
pub struct Emulator {
    pub cpu: Cpu,
    pub ppu: Ppu,
    pub timer: Timer,
    pub memory: AddressSpace,
    frames: u64,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    /// Power-on state as left by the boot ROM, with an empty cartridge.
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            timer: Timer::new(),
            memory: AddressSpace::new(),
            frames: 0,
        }
    }

    pub fn with_rom(rom: &[u8]) -> Self {
        let mut emulator = Self::new();
        emulator.load_rom(rom);
        emulator
    }

    pub fn load_rom(&mut self, rom: &[u8]) {
        self.memory.load_rom(rom);
    }

    /// Runs one CPU step and feeds its cycles to the timer.
    pub fn step(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.memory);
        if self.timer.advance(cycles, &mut self.memory) {
            trace!("emulator: timer overflow");
        }
        cycles
    }

    /// [`Emulator::step`] followed by the PPU. Returns true when a frame completed.
    pub fn run_one_tick(&mut self) -> bool {
        let cycles = self.step();
        let frame_done = self.ppu.render(cycles, &mut self.memory);
        if frame_done {
            self.frames += 1;
            debug!("emulator: frame {} done", self.frames);
        }
        frame_done
    }

    /// Ticks until the PPU reports a finished frame.
    ///
    /// With the LCD switched off no frame ever completes, so this gives up
    /// after one frame's worth of cycles and returns false.
    pub fn run_frame(&mut self) -> bool {
        const CYCLES_PER_FRAME: u64 = 456 * 154;
        let start = self.cpu.cycles;
        while self.cpu.cycles - start <= CYCLES_PER_FRAME {
            if self.run_one_tick() {
                return true;
            }
        }
        false
    }

    /// Frames completed since power on.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot::from_cpu(&self.cpu, &self.memory)
    }

    pub fn frame_buffer(&self) -> &[u8] {
        self.ppu.frame_buffer()
    }

    pub fn frame_rgba(&self) -> Vec<u8> {
        self.ppu.frame_rgba()
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        self.memory.read_byte(addr)
    }

    pub fn set_button(&mut self, button: Button) {
        self.memory.set_button(button);
    }

    pub fn clear_button(&mut self, button: Button) {
        self.memory.clear_button(button);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.memory.set_direction(direction);
    }

    pub fn clear_direction(&mut self, direction: Direction) {
        self.memory.clear_direction(direction);
    }

    /// Bytes the program sent through the serial port since the last call.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.memory.take_serial_output()
    }
}
