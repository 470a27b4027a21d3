pub mod terminal;

use core::fmt;

use log::{debug, trace};

use crate::constants::*;
use crate::interrupts::{Interrupt, request_interrupt};
use crate::mmu::Memory;

/// Reference DMG shades for color indices 0-3, lightest first.
pub const REFERENCE_PALETTE: [[u8; 3]; 4] = [
    [0xE0, 0xF8, 0xD0],
    [0x88, 0xC0, 0x70],
    [0x34, 0x68, 0x56],
    [0x08, 0x18, 0x20],
];

const MAX_SPRITES_PER_LINE: usize = 10;
const TILE_BYTES: u16 = 16;

// OAM attribute bits
const ATTR_BG_PRIORITY: u8 = 0x80;
const ATTR_Y_FLIP: u8 = 0x40;
const ATTR_X_FLIP: u8 = 0x20;
const ATTR_PALETTE: u8 = 0x10;

/// The mode reported in STAT bits 1-0.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

impl Mode {
    fn bits(self) -> u8 {
        self as u8
    }
}

/// Scanline state machine and rasterizer. Registers, VRAM and OAM all live in
/// the address space, the PPU only keeps timing state and the framebuffer.
pub struct Ppu {
    dot: u32,
    mode: Mode,
    lcd_on: bool,
    // Rows of the window drawn so far this frame.
    window_line: u8,
    frame_buffer: Box<[u8; FRAME_BUFFER_SIZE]>,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            dot: 0,
            mode: Mode::OamScan,
            lcd_on: true,
            window_line: 0,
            frame_buffer: Box::new([0; FRAME_BUFFER_SIZE]),
        }
    }

    /// Progress within the current line, 0-455.
    pub fn dot(&self) -> u32 {
        self.dot
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// 160x144 shades 0-3, row major.
    pub fn frame_buffer(&self) -> &[u8; FRAME_BUFFER_SIZE] {
        &self.frame_buffer
    }

    /// The framebuffer resolved through [`REFERENCE_PALETTE`] as RGBA bytes.
    pub fn frame_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(FRAME_BUFFER_SIZE * 4);
        for &shade in self.frame_buffer.iter() {
            let [r, g, b] = REFERENCE_PALETTE[(shade & 0x03) as usize];
            rgba.extend_from_slice(&[r, g, b, 0xFF]);
        }
        rgba
    }

    pub fn set_ly(&mut self, mem: &mut impl Memory, val: u8) {
        mem.write_byte(ADDR_PPU_LY, val);
    }

    /// Advances the state machine by a number of dots (clock cycles).
    /// Returns true when LY wraps from 153 back to 0, i.e. once per frame.
    pub fn render(&mut self, cycles: u32, mem: &mut impl Memory) -> bool {
        let lcdc = mem.read_byte(ADDR_PPU_LCDC);
        if lcdc & LCDC_LCD_ENABLE == 0 {
            if self.lcd_on {
                debug!("ppu: LCD off");
                self.lcd_on = false;
            }
            self.dot = 0;
            self.mode = Mode::HBlank;
            mem.write_byte(ADDR_PPU_LY, 0);
            self.write_mode_bits(mem);
            return false;
        }
        if !self.lcd_on {
            debug!("ppu: LCD on");
            self.lcd_on = true;
            self.dot = 0;
            self.mode = Mode::OamScan;
            self.window_line = 0;
            mem.write_byte(ADDR_PPU_LY, 0);
            self.compare_lyc(0, mem);
        }

        let mut frame_done = false;
        let mut remaining = cycles;
        while remaining > 0 {
            // Walk in chunks so that no mode boundary is skipped.
            let boundary = match self.dot {
                0..OAM_SCAN_END_DOT => OAM_SCAN_END_DOT,
                OAM_SCAN_END_DOT..PIXEL_TRANSFER_END_DOT => PIXEL_TRANSFER_END_DOT,
                _ => DOTS_PER_LINE,
            };
            let chunk = remaining.min(boundary - self.dot);
            self.dot += chunk;
            remaining -= chunk;

            if self.dot >= DOTS_PER_LINE {
                self.dot -= DOTS_PER_LINE;
                frame_done |= self.next_line(mem);
            }
            self.update_mode(mem);
        }
        frame_done
    }

    /// Moves LY to the next line. Returns true on the 153 -> 0 wrap.
    fn next_line(&mut self, mem: &mut impl Memory) -> bool {
        let ly = mem.read_byte(ADDR_PPU_LY);
        let next = if ly >= LINES_PER_FRAME - 1 { 0 } else { ly + 1 };
        mem.write_byte(ADDR_PPU_LY, next);
        trace!("ppu: LY {} -> {}", ly, next);

        self.compare_lyc(next, mem);

        if next == VBLANK_START_LINE {
            self.mode = Mode::VBlank;
            request_interrupt(mem, Interrupt::VBlank);
            if mem.read_byte(ADDR_PPU_STAT) & STAT_VBLANK_INT != 0 {
                request_interrupt(mem, Interrupt::LcdStat);
            }
        }

        if next == 0 {
            self.window_line = 0;
        }
        if (next as usize) < SCREEN_HEIGHT {
            self.render_row(next, mem);
        }
        next == 0
    }

    fn compare_lyc(&mut self, ly: u8, mem: &mut impl Memory) {
        let stat = mem.read_byte(ADDR_PPU_STAT);
        if ly == mem.read_byte(ADDR_PPU_LYC) {
            mem.write_byte(ADDR_PPU_STAT, stat | STAT_COINCIDENCE);
            if stat & STAT_LYC_INT != 0 {
                request_interrupt(mem, Interrupt::LcdStat);
            }
        } else {
            mem.write_byte(ADDR_PPU_STAT, stat & !STAT_COINCIDENCE);
        }
    }

    fn update_mode(&mut self, mem: &mut impl Memory) {
        let ly = mem.read_byte(ADDR_PPU_LY);
        let mode = if ly >= VBLANK_START_LINE {
            Mode::VBlank
        } else if self.dot < OAM_SCAN_END_DOT {
            Mode::OamScan
        } else if self.dot < PIXEL_TRANSFER_END_DOT {
            Mode::Drawing
        } else {
            Mode::HBlank
        };

        if mode != self.mode {
            self.mode = mode;
            let stat = mem.read_byte(ADDR_PPU_STAT);
            let source = match mode {
                Mode::HBlank => STAT_HBLANK_INT,
                Mode::OamScan => STAT_OAM_INT,
                _ => 0,
            };
            if stat & source != 0 {
                request_interrupt(mem, Interrupt::LcdStat);
            }
        }
        self.write_mode_bits(mem);
    }

    fn write_mode_bits(&self, mem: &mut impl Memory) {
        let stat = mem.read_byte(ADDR_PPU_STAT);
        mem.write_byte(ADDR_PPU_STAT, (stat & !STAT_MODE_MASK) | self.mode.bits());
    }

    /// Rasterizes one scanline into the framebuffer, overwriting all of it.
    pub fn render_row(&mut self, line: u8, mem: &impl Memory) {
        let line = line as usize;
        if line >= SCREEN_HEIGHT {
            return;
        }
        let lcdc = mem.read_byte(ADDR_PPU_LCDC);
        let bgp = mem.read_byte(ADDR_PPU_BGP);

        // Raw color indices, sprites need them for the priority check.
        let mut bg_index = [0u8; SCREEN_WIDTH];

        if lcdc & LCDC_BG_ENABLE != 0 {
            let scx = mem.read_byte(ADDR_PPU_SCX);
            let scy = mem.read_byte(ADDR_PPU_SCY);
            let map_base = if lcdc & LCDC_BG_MAP != 0 { 0x9C00 } else { 0x9800 };
            let y = (line as u8).wrapping_add(scy);
            for (x, slot) in bg_index.iter_mut().enumerate() {
                let map_x = (x as u8).wrapping_add(scx);
                *slot = tile_pixel(mem, lcdc, map_base, map_x, y);
            }

            let wy = mem.read_byte(ADDR_PPU_WY);
            let wx = mem.read_byte(ADDR_PPU_WX);
            if lcdc & LCDC_WINDOW_ENABLE != 0 && line >= wy as usize && wx <= 166 {
                let win_map = if lcdc & LCDC_WINDOW_MAP != 0 { 0x9C00 } else { 0x9800 };
                let start = (wx as usize).saturating_sub(7);
                for (x, slot) in bg_index.iter_mut().enumerate().skip(start) {
                    let win_x = (x + 7 - wx as usize) as u8;
                    *slot = tile_pixel(mem, lcdc, win_map, win_x, self.window_line);
                }
                if start < SCREEN_WIDTH {
                    self.window_line = self.window_line.wrapping_add(1);
                }
            }
        }

        let row = line_slice(&mut self.frame_buffer, line);
        for (pixel, &index) in row.iter_mut().zip(bg_index.iter()) {
            *pixel = shade(bgp, index);
        }

        if lcdc & LCDC_OBJ_ENABLE != 0 {
            self.render_sprites(line as u8, lcdc, &bg_index, mem);
        }
    }

    fn render_sprites(&mut self, ly: u8, lcdc: u8, bg_index: &[u8; SCREEN_WIDTH], mem: &impl Memory) {
        let height: u8 = if lcdc & LCDC_OBJ_SIZE != 0 { 16 } else { 8 };

        // OAM order decides which 10 are picked.
        let mut sprites: Vec<(u8, u8, u8, u8)> = (0..OAM_SIZE / 4)
            .map(|i| {
                let base = ADDR_OAM_START + i * 4;
                (
                    mem.read_byte(base),
                    mem.read_byte(base + 1),
                    mem.read_byte(base + 2),
                    mem.read_byte(base + 3),
                )
            })
            .filter(|&(y, _, _, _)| {
                let top = y as i16 - 16;
                (top..top + height as i16).contains(&(ly as i16))
            })
            .take(MAX_SPRITES_PER_LINE)
            .collect();
        // Lower X wins, ties go to the earlier OAM entry (sort is stable).
        sprites.sort_by_key(|&(_, x, _, _)| x);

        let obp0 = mem.read_byte(ADDR_PPU_OBP0);
        let obp1 = mem.read_byte(ADDR_PPU_OBP1);
        let mut claimed = [false; SCREEN_WIDTH];
        let row = line_slice(&mut self.frame_buffer, ly as usize);

        for (y, x, tile, attrs) in sprites {
            let mut line_in_tile = (ly as i16 - (y as i16 - 16)) as u8;
            if attrs & ATTR_Y_FLIP != 0 {
                line_in_tile = height - 1 - line_in_tile;
            }
            let tile = if height == 16 { tile & 0xFE } else { tile };
            let addr = ADDR_VRAM_START + tile as u16 * TILE_BYTES + line_in_tile as u16 * 2;
            let low = mem.read_byte(addr);
            let high = mem.read_byte(addr + 1);
            let palette = if attrs & ATTR_PALETTE != 0 { obp1 } else { obp0 };

            for offset in 0..8u8 {
                let screen_x = x as i16 - 8 + offset as i16;
                if !(0..SCREEN_WIDTH as i16).contains(&screen_x) {
                    continue;
                }
                let screen_x = screen_x as usize;
                if claimed[screen_x] {
                    continue;
                }
                let bit = if attrs & ATTR_X_FLIP != 0 { offset } else { 7 - offset };
                let color = color_index(low, high, bit);
                // Color 0 is transparent
                if color == 0 {
                    continue;
                }
                claimed[screen_x] = true;
                if attrs & ATTR_BG_PRIORITY != 0 && bg_index[screen_x] != 0 {
                    continue;
                }
                row[screen_x] = shade(palette, color);
            }
        }
    }
}

fn line_slice(buffer: &mut [u8; FRAME_BUFFER_SIZE], line: usize) -> &mut [u8] {
    &mut buffer[line * SCREEN_WIDTH..(line + 1) * SCREEN_WIDTH]
}

fn color_index(low: u8, high: u8, bit: u8) -> u8 {
    (((high >> bit) & 1) << 1) | ((low >> bit) & 1)
}

fn shade(palette: u8, index: u8) -> u8 {
    (palette >> (index * 2)) & 0b11
}

/// Address of a tile's first byte for the addressing mode in LCDC bit 4.
pub fn tile_data_address(lcdc: u8, tile_id: u8) -> u16 {
    if lcdc & LCDC_TILE_DATA != 0 {
        // Unsigned mode: Base is 0x8000
        ADDR_VRAM_START + tile_id as u16 * TILE_BYTES
    } else {
        // Signed mode: Base is 0x9000, tile_id is i8
        0x9000u16.wrapping_add_signed(tile_id as i8 as i16 * TILE_BYTES as i16)
    }
}

/// Color index at (x, y) of the 256x256 plane described by a tile map.
fn tile_pixel(mem: &impl Memory, lcdc: u8, map_base: u16, x: u8, y: u8) -> u8 {
    let map_index = (y as u16 / 8) * 32 + x as u16 / 8;
    let tile_id = mem.read_byte(map_base + map_index);
    let addr = tile_data_address(lcdc, tile_id) + (y as u16 % 8) * 2;
    color_index(mem.read_byte(addr), mem.read_byte(addr + 1), 7 - (x % 8))
}

impl fmt::Debug for Ppu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode_str = match self.mode {
            Mode::HBlank => "H-Blank",
            Mode::VBlank => "V-Blank",
            Mode::OamScan => "OAM Scan",
            Mode::Drawing => "Drawing",
        };
        write!(
            f,
            "--- PPU State ---\n\
             DOTS: {:<3} | MODE: {}\n\
             LCD:  {}   | WINDOW LINE: {}\n\
             -----------------",
            self.dot,
            mode_str,
            if self.lcd_on { "on " } else { "off" },
            self.window_line,
        )
    }
}
