use std::time::Duration;

// Constants for flags
pub const FLAG_Z: u8 = 0b1000_0000;
pub const FLAG_N: u8 = 0b0100_0000;
pub const FLAG_H: u8 = 0b0010_0000;
pub const FLAG_C: u8 = 0b0001_0000;

pub const CB_PREFIX_OPCODE_BYTE: u8 = 0xCB;

pub const GAME_BOY_FILE_EXT: &str = "gb";

/// 64 Kb - The standard Game Boy address space
pub const MEMORY_SIZE: usize = 1024 * 64;

// Joypad and serial
pub const ADDR_JOYP: u16 = 0xFF00;
pub const ADDR_SERIAL_SB: u16 = 0xFF01;
pub const ADDR_SERIAL_SC: u16 = 0xFF02;

// Timer registers
pub const ADDR_TIMER_DIV: u16 = 0xFF04;
pub const ADDR_TIMER_TIMA: u16 = 0xFF05;
pub const ADDR_TIMER_TMA: u16 = 0xFF06;
pub const ADDR_TIMER_TAC: u16 = 0xFF07;

pub const IF_ADDR: u16 = 0xFF0F;
pub const IE_ADDR: u16 = 0xFFFF;

// PPU registers
pub const ADDR_PPU_LCDC: u16 = 0xFF40;
pub const ADDR_PPU_STAT: u16 = 0xFF41;
pub const ADDR_PPU_SCY: u16 = 0xFF42;
pub const ADDR_PPU_SCX: u16 = 0xFF43;
pub const ADDR_PPU_LY: u16 = 0xFF44;
pub const ADDR_PPU_LYC: u16 = 0xFF45;
pub const ADDR_PPU_DMA: u16 = 0xFF46;
pub const ADDR_PPU_BGP: u16 = 0xFF47;
pub const ADDR_PPU_OBP0: u16 = 0xFF48;
pub const ADDR_PPU_OBP1: u16 = 0xFF49;
pub const ADDR_PPU_WY: u16 = 0xFF4A;
pub const ADDR_PPU_WX: u16 = 0xFF4B;

pub const ADDR_VRAM_START: u16 = 0x8000;
pub const ADDR_OAM_START: u16 = 0xFE00;
pub const OAM_SIZE: u16 = 0xA0; // 160 bytes.

// Interrupt vectors
pub const ADDR_VEC_VBLANK: u16 = 0x0040;
pub const ADDR_VEC_LCD_STAT: u16 = 0x0048;
pub const ADDR_VEC_TIMER: u16 = 0x0050;
pub const ADDR_VEC_SERIAL: u16 = 0x0058;
pub const ADDR_VEC_JOYPAD: u16 = 0x0060;

// LCDC bits
pub const LCDC_BG_ENABLE: u8 = 0b0000_0001;
pub const LCDC_OBJ_ENABLE: u8 = 0b0000_0010;
pub const LCDC_OBJ_SIZE: u8 = 0b0000_0100;
pub const LCDC_BG_MAP: u8 = 0b0000_1000;
pub const LCDC_TILE_DATA: u8 = 0b0001_0000;
pub const LCDC_WINDOW_ENABLE: u8 = 0b0010_0000;
pub const LCDC_WINDOW_MAP: u8 = 0b0100_0000;
pub const LCDC_LCD_ENABLE: u8 = 0b1000_0000;

// STAT bits
pub const STAT_MODE_MASK: u8 = 0b0000_0011;
pub const STAT_COINCIDENCE: u8 = 0b0000_0100;
pub const STAT_HBLANK_INT: u8 = 0b0000_1000;
pub const STAT_VBLANK_INT: u8 = 0b0001_0000;
pub const STAT_OAM_INT: u8 = 0b0010_0000;
pub const STAT_LYC_INT: u8 = 0b0100_0000;

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;
pub const FRAME_BUFFER_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

pub const DOTS_PER_LINE: u32 = 456;
pub const LINES_PER_FRAME: u8 = 154;
pub const VBLANK_START_LINE: u8 = 144;
pub const OAM_SCAN_END_DOT: u32 = 80;
pub const PIXEL_TRANSFER_END_DOT: u32 = 252;

/// Cost of dispatching an interrupt, in clock cycles.
pub const INTERRUPT_DISPATCH_CYCLES: u32 = 20;

pub const FRAME_DURATION: Duration = Duration::from_nanos(16_742_706); // ~59.7 fps
