mod common;

use dmg_core::constants::*;
use dmg_core::input::{Button, Direction};
use dmg_core::interrupts::{Interrupt, request_interrupt};
use dmg_core::mmu::{AddressSpace, Memory};

fn bus() -> AddressSpace {
    let (_, mut bus) = common::setup(&[]);
    bus.write_ie(0x00);
    bus
}

#[test]
fn test_post_boot_registers() {
    let bus = AddressSpace::new();
    assert_eq!(bus.read_byte(ADDR_PPU_LCDC), 0x91);
    assert_eq!(bus.read_byte(ADDR_PPU_BGP), 0xFC);
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xCF);
    assert_eq!(bus.read_if(), 0xE1);
}

#[test]
fn test_flat_storage_round_trip() {
    let mut bus = bus();
    for addr in [0x0000u16, 0x7FFF, 0x8000, 0xC000, 0xE000, 0xFE00, 0xFF80, 0xFFFE] {
        bus.write_byte(addr, 0x5A);
        assert_eq!(bus.read_byte(addr), 0x5A, "addr {:04X}", addr);
    }
    // No echo mirroring.
    bus.write_byte(0xC123, 0x11);
    assert_ne!(bus.read_byte(0xE123), 0x11);
}

#[test]
fn test_u16_little_endian() {
    let mut bus = bus();
    bus.write_u16(0xC000, 0xBEEF);
    assert_eq!(bus.read_byte(0xC000), 0xEF);
    assert_eq!(bus.read_byte(0xC001), 0xBE);
    assert_eq!(bus.read_u16(0xC000), 0xBEEF);
}

#[test]
fn test_pending_interrupts_mask() {
    let mut bus = bus();
    bus.write_if(0xFF);
    bus.write_ie(0x05);
    assert_eq!(bus.pending_interrupts(), 0x05);
    bus.write_ie(0xE0);
    assert!(!bus.pending_interrupt(), "Only the low five bits are sources");
}

#[test]
fn test_request_interrupt_sets_if_bit() {
    let mut bus = bus();
    request_interrupt(&mut bus, Interrupt::Serial);
    request_interrupt(&mut bus, Interrupt::Timer);
    assert_eq!(bus.read_if(), 0x0C);
}

#[test]
fn test_joypad_directions_selected() {
    let mut bus = bus();
    bus.write_byte(ADDR_JOYP, 0x20); // bit 4 low: directions
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xEF);

    bus.set_direction(Direction::Right);
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xEE);
    assert_eq!(bus.read_if(), Interrupt::Joypad.bit());

    bus.write_if(0);
    bus.set_button(Button::A);
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xEE, "Buttons are not selected");
    assert_eq!(bus.read_if(), 0, "Unselected group raises nothing");

    bus.clear_direction(Direction::Right);
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xEF);
}

#[test]
fn test_joypad_buttons_selected() {
    let mut bus = bus();
    bus.write_byte(ADDR_JOYP, 0x10); // bit 5 low: buttons
    bus.set_button(Button::Start);
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xD7);
    assert_eq!(bus.read_if(), Interrupt::Joypad.bit());

    bus.clear_button(Button::Start);
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xDF);
}

#[test]
fn test_joypad_low_nibble_not_writable() {
    let mut bus = bus();
    bus.write_byte(ADDR_JOYP, 0x30);
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xFF);
    bus.write_byte(ADDR_JOYP, 0x00);
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xCF);
    bus.write_byte(ADDR_JOYP, 0x0F);
    assert_eq!(bus.read_byte(ADDR_JOYP), 0xCF);
}

#[test]
fn test_serial_transfer_capture() {
    let mut bus = bus();
    bus.write_byte(ADDR_SERIAL_SB, b'P');
    bus.write_byte(ADDR_SERIAL_SC, 0x01); // internal clock without start
    assert!(bus.serial_output().is_empty());
    bus.write_byte(ADDR_SERIAL_SC, 0x81);
    assert_eq!(bus.take_serial_output(), b"P".to_vec());
    assert_eq!(bus.read_byte(ADDR_SERIAL_SC), 0x81);
}

#[test]
fn test_dma_from_work_ram() {
    let mut bus = bus();
    for i in 0..OAM_SIZE {
        bus.write_byte(0xC100 + i, 0xFF - i as u8);
    }
    bus.write_byte(ADDR_PPU_DMA, 0xC1);
    assert_eq!(bus.read_byte(ADDR_OAM_START), 0xFF);
    assert_eq!(bus.read_byte(ADDR_OAM_START + OAM_SIZE - 1), 0x60);
    assert_eq!(bus.read_byte(ADDR_PPU_DMA), 0xC1);
}
