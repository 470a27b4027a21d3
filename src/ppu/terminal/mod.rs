use std::fmt::Write;

use crate::constants::*;
use crate::ppu::Ppu;

/// Renders the framebuffer as ANSI half blocks, two pixel rows per text row.
pub fn frame_to_ansi(buffer: &[u8; FRAME_BUFFER_SIZE]) -> String {
    // Each cell is two escape sequences plus the glyph.
    let mut output = String::with_capacity(SCREEN_WIDTH * SCREEN_HEIGHT * 12);

    // Move cursor to top-left (don't clear screen to avoid flickering)
    output.push_str("\x1B[H");

    for y in (0..SCREEN_HEIGHT).step_by(2) {
        for x in 0..SCREEN_WIDTH {
            let top_pixel = buffer[y * SCREEN_WIDTH + x];
            let bottom_pixel = buffer[(y + 1) * SCREEN_WIDTH + x];

            // Grayscale ramp 232-255, shade 0 is the lightest.
            let top_color = 255 - top_pixel * 7;
            let bottom_color = 255 - bottom_pixel * 7;

            // ▄ is the Unicode "Lower Half Block"
            let _ = write!(
                output,
                "\x1B[38;5;{}m\x1B[48;5;{}m▄",
                bottom_color, top_color
            );
        }
        output.push_str("\x1B[0m\n");
    }
    output
}

pub fn display_frame(ppu: &Ppu) {
    print!("{}", frame_to_ansi(ppu.frame_buffer()));
}
