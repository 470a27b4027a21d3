use log::trace;

use crate::constants::*;
use crate::interrupts::{Interrupt, request_interrupt};
use crate::mmu::Memory;

/// Clock cycles between two DIV increments.
const DIV_PERIOD: u32 = 256;

/// Divider and programmable timer.
///
/// The software-visible registers (DIV, TIMA, TMA, TAC) live in the address
/// space; this struct only carries the sub-register accumulators.
#[derive(Debug, Default, Clone)]
pub struct Timer {
    pub div_counter: u32,
    pub tima_counter: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            div_counter: 0,
            tima_counter: 0,
        }
    }

    /// Maps TAC bits 0-1 to the number of clock cycles per TIMA increment.
    pub fn period(tac: u8) -> u32 {
        match tac & 0b11 {
            0b00 => 1024, // 4096 Hz
            0b01 => 16,   // 262144 Hz
            0b10 => 64,   // 65536 Hz
            0b11 => 256,  // 16384 Hz
            _ => unreachable!(),
        }
    }

    pub fn timer_enabled(tac: u8) -> bool {
        // Bit 2 of TAC (0xFF07) enables/disables the TIMA counter
        (tac & 0b100) != 0
    }

    /// Feeds elapsed clock cycles into both counters.
    /// Returns true if TIMA overflowed and a Timer interrupt was requested.
    pub fn advance(&mut self, cycles: u32, mem: &mut impl Memory) -> bool {
        if mem.take_divider_reset() {
            trace!("timer: divider reset");
            self.div_counter = 0;
            self.tima_counter = 0;
        }

        self.div_counter += cycles;
        while self.div_counter >= DIV_PERIOD {
            self.div_counter -= DIV_PERIOD;
            let div = mem.read_byte(ADDR_TIMER_DIV);
            mem.write_divider(div.wrapping_add(1));
        }

        let tac = mem.read_byte(ADDR_TIMER_TAC);
        if !Self::timer_enabled(tac) {
            return false;
        }

        let period = Self::period(tac);
        let mut interrupt_requested = false;
        self.tima_counter += cycles;
        while self.tima_counter >= period {
            self.tima_counter -= period;
            if self.increment_tima(mem) {
                interrupt_requested = true;
            }
        }
        interrupt_requested
    }

    fn increment_tima(&mut self, mem: &mut impl Memory) -> bool {
        let (new_tima, overflow) = mem.read_byte(ADDR_TIMER_TIMA).overflowing_add(1);
        if overflow {
            let tma = mem.read_byte(ADDR_TIMER_TMA);
            trace!("timer: TIMA overflow, reload 0x{:02X}", tma);
            mem.write_byte(ADDR_TIMER_TIMA, tma);
            request_interrupt(mem, Interrupt::Timer);
            true
        } else {
            mem.write_byte(ADDR_TIMER_TIMA, new_tima);
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mmu::AddressSpace;

    fn setup(tac: u8, tima: u8, tma: u8) -> (Timer, AddressSpace) {
        let mut mem = AddressSpace::new();
        mem.write_byte(ADDR_TIMER_TAC, tac);
        mem.write_byte(ADDR_TIMER_TIMA, tima);
        mem.write_byte(ADDR_TIMER_TMA, tma);
        mem.write_if(0x00);
        mem.write_byte(ADDR_TIMER_DIV, 0x00);
        (Timer::new(), mem)
    }

    #[test]
    fn test_divider_overflow_keeps_remainder() {
        let (mut timer, mut mem) = setup(0x00, 0x00, 0x00);
        timer.advance(300, &mut mem);
        assert_eq!(mem.read_byte(ADDR_TIMER_DIV), 1);
        assert_eq!(timer.div_counter, 44);

        timer.advance(212, &mut mem);
        assert_eq!(mem.read_byte(ADDR_TIMER_DIV), 2);
        assert_eq!(timer.div_counter, 0);
    }

    #[test]
    fn test_div_write_resets_accumulator() {
        let (mut timer, mut mem) = setup(0x05, 0x00, 0x00);
        timer.advance(250, &mut mem);
        assert_eq!(mem.read_byte(ADDR_TIMER_TIMA), 15);

        mem.write_byte(ADDR_TIMER_DIV, 0x12);
        assert_eq!(mem.read_byte(ADDR_TIMER_DIV), 0);

        // Without the reset the pending 250 cycles would roll DIV over here.
        timer.advance(10, &mut mem);
        assert_eq!(mem.read_byte(ADDR_TIMER_DIV), 0);
        assert_eq!(timer.div_counter, 10);
        assert_eq!(mem.read_byte(ADDR_TIMER_TIMA), 15);
    }
}
