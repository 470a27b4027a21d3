mod common;

use common::{PROGRAM_START, setup};
use dmg_core::constants::*;
use dmg_core::cpu::Flags;
use dmg_core::mmu::Memory;

const NOP: u8 = 0x00;
const STOP: u8 = 0x10;
const JR: u8 = 0x18;
const JR_NZ: u8 = 0x20;
const LD_HL_NN: u8 = 0x21;
const LD_HLI_A: u8 = 0x22;
const LD_A_HLD: u8 = 0x3A;
const INC_A: u8 = 0x3C;
const HALT: u8 = 0x76;
const RLCA: u8 = 0x07;
const LD_B_N: u8 = 0x06;
const ADD_A_N: u8 = 0xC6;
const DAA: u8 = 0x27;
const POP_BC: u8 = 0xC1;
const PUSH_BC: u8 = 0xC5;
const LD_BC_NN: u8 = 0x01;
const POP_AF: u8 = 0xF1;
const PUSH_AF: u8 = 0xF5;
const CALL_NN: u8 = 0xCD;
const RET: u8 = 0xC9;
const RETI: u8 = 0xD9;
const RST_38: u8 = 0xFF;
const CB_PREFIX: u8 = 0xCB;
const DI: u8 = 0xF3;
const EI: u8 = 0xFB;

#[test]
fn test_jr_backward_and_forward() {
    let (mut cpu, mut mem) = setup(&[]);
    mem.force_write_bytes(0x1234, &[JR, 0xF8]); // -8
    cpu.pc = 0x1234;
    assert_eq!(cpu.step(&mut mem), 12);
    assert_eq!(cpu.pc, 0x122E, "Offset is relative to the end of JR");

    mem.force_write_bytes(0x1234, &[JR, 0x08]);
    cpu.pc = 0x1234;
    cpu.step(&mut mem);
    assert_eq!(cpu.pc, 0x123E);
}

#[test]
fn test_conditional_not_taken_only_advances() {
    let (mut cpu, mut mem) = setup(&[]);
    mem.force_write_bytes(0x1234, &[JR_NZ, 0xF8]);
    cpu.pc = 0x1234;
    cpu.flags.z = true;
    assert_eq!(cpu.step(&mut mem), 8);
    assert_eq!(cpu.pc, 0x1236);

    // JP NZ, CALL NZ and RET NZ
    mem.force_write_bytes(0x1236, &[0xC2, 0x00, 0x20, 0xC4, 0x00, 0x20, 0xC0]);
    assert_eq!(cpu.step(&mut mem), 12);
    assert_eq!(cpu.pc, 0x1239);
    assert_eq!(cpu.step(&mut mem), 12);
    assert_eq!(cpu.pc, 0x123C);
    assert_eq!(cpu.sp, 0xFFFE, "Untaken CALL must not push");
    assert_eq!(cpu.step(&mut mem), 8);
    assert_eq!(cpu.pc, 0x123D);
}

#[test]
fn test_ei_delay_timing() {
    let (mut cpu, mut mem) = setup(&[EI, NOP, NOP]);

    cpu.step(&mut mem);
    assert!(!cpu.ime, "IME should not be enabled immediately after EI");
    assert_eq!(cpu.ime_scheduled, 1, "IME should be scheduled for next step");

    cpu.step(&mut mem);
    assert!(cpu.ime, "IME turns on after the instruction following EI");
    assert_eq!(cpu.ime_scheduled, 0);
}

#[test]
fn test_di_cancels_pending_ei() {
    let (mut cpu, mut mem) = setup(&[EI, DI, NOP]);
    cpu.step(&mut mem);
    cpu.step(&mut mem);
    cpu.step(&mut mem);
    assert!(!cpu.ime);
}

#[test]
fn test_interrupt_dispatch_after_ei() {
    let (mut cpu, mut mem) = setup(&[EI, NOP, NOP]);
    mem.write_ie(0x01);
    mem.write_if(0x01);

    cpu.step(&mut mem); // EI
    cpu.step(&mut mem); // NOP, IME turns on afterwards
    assert_eq!(cpu.pc, 0x0102);

    let cycles = cpu.step(&mut mem);
    assert_eq!(cycles, INTERRUPT_DISPATCH_CYCLES);
    assert_eq!(cpu.pc, ADDR_VEC_VBLANK);
    assert!(!cpu.ime);
    assert_eq!(mem.read_if() & 0x01, 0, "Serviced request is acknowledged");
    assert_eq!(mem.read_u16(cpu.sp), 0x0102, "Return address is pushed");
}

#[test]
fn test_interrupt_priority_lowest_bit_wins() {
    let (mut cpu, mut mem) = setup(&[NOP]);
    cpu.ime = true;
    mem.write_ie(0x1F);
    mem.write_if(0x06);
    cpu.step(&mut mem);
    assert_eq!(cpu.pc, ADDR_VEC_LCD_STAT);
    assert_eq!(mem.read_if(), 0x04);
}

#[test]
fn test_disabled_source_is_ignored() {
    let (mut cpu, mut mem) = setup(&[NOP]);
    cpu.ime = true;
    mem.write_ie(0x00);
    mem.write_if(0x1F);
    cpu.step(&mut mem);
    assert_eq!(cpu.pc, PROGRAM_START + 1);
}

#[test]
fn test_halt_waits_for_enabled_request() {
    let (mut cpu, mut mem) = setup(&[HALT, NOP]);
    mem.write_ie(0x04);

    cpu.step(&mut mem);
    assert!(cpu.halted);
    for _ in 0..10 {
        assert_eq!(cpu.step(&mut mem), 4);
        assert!(cpu.halted);
        assert_eq!(cpu.pc, 0x0101);
    }

    // IME is off: wake up and carry on without dispatching.
    mem.write_if(0x04);
    cpu.step(&mut mem);
    assert!(!cpu.halted);
    assert_eq!(cpu.pc, 0x0102);
    assert_eq!(mem.read_if(), 0x04, "Request stays pending with IME off");
}

#[test]
fn test_halt_bug_repeats_next_byte() {
    let (mut cpu, mut mem) = setup(&[HALT, INC_A, NOP]);
    mem.write_ie(0x04);
    mem.write_if(0x04);
    assert_eq!(cpu.a, 0x01);

    cpu.step(&mut mem);
    assert!(!cpu.halted, "HALT with IME off and a pending request does not halt");
    assert!(cpu.halt_bug_triggered);

    cpu.step(&mut mem);
    assert_eq!(cpu.a, 0x02);
    assert_eq!(cpu.pc, 0x0101, "PC did not advance past the opcode");

    cpu.step(&mut mem);
    assert_eq!(cpu.a, 0x03);
    assert_eq!(cpu.pc, 0x0102);
}

#[test]
fn test_ei_halt_dispatches_and_returns_to_halt() {
    let (mut cpu, mut mem) = setup(&[EI, HALT, NOP]);
    mem.force_write_bytes(ADDR_VEC_VBLANK, &[INC_A, INC_A, RETI]);
    mem.write_ie(0x01);
    mem.write_if(0x01);

    cpu.step(&mut mem); // EI
    cpu.step(&mut mem); // HALT, IME turns on afterwards
    assert!(cpu.ime);

    assert_eq!(cpu.step(&mut mem), INTERRUPT_DISPATCH_CYCLES);
    assert_eq!(cpu.pc, ADDR_VEC_VBLANK);
    assert!(!cpu.halt_bug_triggered, "Dispatch consumes the latch");
    assert_eq!(mem.read_u16(cpu.sp), 0x0101, "Return address is the HALT");

    cpu.step(&mut mem);
    assert_eq!(cpu.pc, ADDR_VEC_VBLANK + 1, "Handler fetch advances PC");
    assert_eq!(cpu.a, 0x02);
    cpu.step(&mut mem);
    assert_eq!(cpu.a, 0x03);

    cpu.step(&mut mem); // RETI
    assert_eq!(cpu.pc, 0x0101);
    cpu.step(&mut mem);
    assert!(cpu.halted, "HALT runs again with nothing pending");
    assert_eq!(cpu.pc, 0x0102);
}

#[test]
fn test_stop_consumes_padding_byte() {
    let (mut cpu, mut mem) = setup(&[STOP, 0x00, NOP]);
    assert_eq!(cpu.step(&mut mem), 4);
    assert_eq!(cpu.pc, 0x0102);
    assert!(cpu.halted);
}

#[test]
fn test_rst_pushes_and_jumps() {
    let (mut cpu, mut mem) = setup(&[RST_38]);
    assert_eq!(cpu.step(&mut mem), 16);
    assert_eq!(cpu.pc, 0x0038);
    assert_eq!(cpu.sp, 0xFFFC);
    assert_eq!(mem.read_byte(0xFFFD), 0x01, "High byte at SP+1");
    assert_eq!(mem.read_byte(0xFFFC), 0x01, "Low byte at SP");
}

#[test]
fn test_call_ret_round_trip() {
    let (mut cpu, mut mem) = setup(&[CALL_NN, 0x00, 0x20]);
    mem.force_write_byte(0x2000, RET);
    assert_eq!(cpu.step(&mut mem), 24);
    assert_eq!(cpu.pc, 0x2000);
    assert_eq!(cpu.step(&mut mem), 16);
    assert_eq!(cpu.pc, 0x0103);
    assert_eq!(cpu.sp, 0xFFFE);
}

#[test]
fn test_reti_enables_immediately() {
    let (mut cpu, mut mem) = setup(&[CALL_NN, 0x00, 0x20]);
    mem.force_write_byte(0x2000, RETI);
    cpu.step(&mut mem);
    cpu.step(&mut mem);
    assert!(cpu.ime);
    assert_eq!(cpu.ime_scheduled, 0);
    assert_eq!(cpu.pc, 0x0103);
}

#[test]
fn test_push_pop_af_masks_low_nibble() {
    let (mut cpu, mut mem) = setup(&[PUSH_AF, POP_BC, LD_BC_NN, 0xFF, 0x34, PUSH_BC, POP_AF]);
    cpu.a = 0x12;
    cpu.flags = Flags::from_byte(0xF0);

    assert_eq!(cpu.step(&mut mem), 16);
    assert_eq!(cpu.step(&mut mem), 12);
    assert_eq!((cpu.b, cpu.c), (0x12, 0xF0));

    cpu.step(&mut mem);
    cpu.step(&mut mem);
    cpu.step(&mut mem);
    assert_eq!(cpu.a, 0x34);
    assert_eq!(cpu.f(), 0xF0, "Low nibble of F always reads zero");
}

#[test]
fn test_cb_operations() {
    let (mut cpu, mut mem) = setup(&[
        CB_PREFIX, 0x37, // SWAP A
        CB_PREFIX, 0x7E, // BIT 7, (HL)
        CB_PREFIX, 0xC6, // SET 0, (HL)
        CB_PREFIX, 0x46, // BIT 0, (HL)
    ]);
    cpu.a = 0xF1;
    cpu.set_reg16(dmg_core::opcodes::Reg16::HL, 0xC000);
    mem.write_byte(0xC000, 0x80);

    assert_eq!(cpu.step(&mut mem), 8);
    assert_eq!(cpu.a, 0x1F);
    assert_eq!(cpu.flags, Flags::default());

    cpu.flags.c = true;
    assert_eq!(cpu.step(&mut mem), 12);
    assert!(!cpu.flags.z);
    assert!(cpu.flags.h);
    assert!(cpu.flags.c, "BIT leaves C alone");

    assert_eq!(cpu.step(&mut mem), 16);
    assert_eq!(mem.read_byte(0xC000), 0x81);

    cpu.step(&mut mem);
    assert!(!cpu.flags.z);
    assert_eq!(cpu.pc, 0x0108);
}

#[test]
fn test_hl_increment_and_decrement_addressing() {
    let (mut cpu, mut mem) = setup(&[LD_HL_NN, 0x00, 0xC0, LD_HLI_A, LD_A_HLD]);
    cpu.a = 0x5A;
    mem.write_byte(0xC001, 0x77);

    cpu.step(&mut mem);
    assert_eq!(cpu.step(&mut mem), 8);
    assert_eq!(mem.read_byte(0xC000), 0x5A);
    assert_eq!((cpu.h, cpu.l), (0xC0, 0x01));

    cpu.step(&mut mem);
    assert_eq!(cpu.a, 0x77);
    assert_eq!((cpu.h, cpu.l), (0xC0, 0x00));
}

#[test]
fn test_instruction_cycles() {
    let cases: [(&[u8], u32); 12] = [
        (&[NOP], 4),
        (&[LD_B_N, 0x12], 8),
        (&[0x36, 0x12], 12),       // LD (HL), n8
        (&[0x34], 12),             // INC (HL)
        (&[0x09], 8),              // ADD HL, BC
        (&[0xE0, 0x80], 12),       // LDH (a8), A
        (&[0xEA, 0x00, 0xC0], 16), // LD (a16), A
        (&[0xC3, 0x00, 0x02], 16), // JP a16
        (&[0x08, 0x00, 0xC0], 20), // LD (a16), SP
        (&[0xE8, 0x02], 16),       // ADD SP, e8
        (&[0xF8, 0x02], 12),       // LD HL, SP+e8
        (&[0xE9], 4),              // JP HL
    ];
    for (program, expected) in cases {
        let (mut cpu, mut mem) = setup(program);
        cpu.set_reg16(dmg_core::opcodes::Reg16::HL, 0xC000);
        assert_eq!(
            cpu.step(&mut mem),
            expected,
            "Cycle count for opcode {:02X}",
            program[0]
        );
        assert_eq!(cpu.cycles, expected as u64);
    }
}

#[test]
fn test_illegal_opcode_is_a_nop() {
    let (mut cpu, mut mem) = setup(&[0xD3, 0xFC]);
    assert_eq!(cpu.step(&mut mem), 4);
    assert_eq!(cpu.step(&mut mem), 4);
    assert_eq!(cpu.pc, 0x0102);
    assert_eq!(cpu.sp, 0xFFFE);
}

#[test]
fn test_rlca_clears_zero_flag() {
    let (mut cpu, mut mem) = setup(&[RLCA]);
    cpu.a = 0x00;
    cpu.flags = Flags::from_byte(0xF0);
    cpu.step(&mut mem);
    assert_eq!(cpu.a, 0x00);
    assert_eq!(cpu.flags, Flags::default());
}

#[test]
fn test_bcd_addition_program() {
    let (mut cpu, mut mem) = setup(&[ADD_A_N, 0x38, DAA]);
    cpu.a = 0x45;
    cpu.step(&mut mem);
    cpu.step(&mut mem);
    assert_eq!(cpu.a, 0x83);
    assert!(!cpu.flags.c);
}

#[test]
fn test_add_sp_offset_flags() {
    let (mut cpu, mut mem) = setup(&[0xE8, 0x01]);
    cpu.sp = 0x00FF;
    cpu.step(&mut mem);
    assert_eq!(cpu.sp, 0x0100);
    assert!(cpu.flags.h && cpu.flags.c);
    assert!(!cpu.flags.z && !cpu.flags.n);
}
