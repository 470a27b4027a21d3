pub mod args;
pub mod cartridge;
pub mod constants;
pub mod cpu;
pub mod emulator;
pub mod input;
pub mod interrupts;
pub mod mmu;
pub mod opcodes;
pub mod ppu;
pub mod timer;

use crate::ppu::terminal::display_frame;

use constants::*;
use emulator::Emulator;
use log::{info, log_enabled, trace};
use mmu::Memory;
use std::io;

use std::path::PathBuf;

use std::io::Write;
use std::time::Instant;

/// Log target for the per-instruction Game Boy Doctor lines.
pub const DOCTOR_TARGET: &str = "doctor";

pub fn setup_logging(log_path: &Option<PathBuf>) -> Result<(), io::Error> {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    // Bare messages, the doctor log must contain nothing else.
    builder.format(|buf, record| writeln!(buf, "{}", record.args()));

    if let Some(path) = log_path {
        let file = std::fs::File::create(path)?;
        // We use Target::Pipe to send logs to the file instead of stderr
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Loads the ROM named on the command line and runs it.
pub fn rom_exec(args: args::Args) -> Result<(), io::Error> {
    setup_logging(&args.log_path)?;
    let buffer = cartridge::load_rom(&args.load_rom)?;

    let mut emulator = Emulator::with_rom(&buffer);
    match args.debug_doctor {
        Some(lines) => doctor_loop(&mut emulator, lines),
        None => main_loop(&mut emulator, &args),
    }

    let serial = emulator.take_serial_output();
    if !serial.is_empty() {
        info!("Serial output: {}", String::from_utf8_lossy(&serial));
    }
    Ok(())
}

/// Emits one doctor line before each instruction, for `lines` instructions.
/// The PPU is not run, LY is pinned to 0x90 as the reference logs expect.
fn doctor_loop(emulator: &mut Emulator, lines: usize) {
    emulator.memory.write_byte(ADDR_PPU_LY, 0x90);
    for _ in 0..lines {
        if log_enabled!(target: DOCTOR_TARGET, log::Level::Info) {
            info!(target: DOCTOR_TARGET, "{}", emulator.snapshot().to_doctor_string());
        }
        emulator.step();
    }
}

/// Runs frame after frame, paced to the hardware refresh rate when the
/// frames are displayed. Returns after `--frames` frames, if given.
fn main_loop(emulator: &mut Emulator, args: &args::Args) {
    let mut last_frame_time = Instant::now();
    let mut frames: u64 = 0;
    loop {
        if !emulator.run_frame() {
            trace!("main_loop: no frame completed, LCD is off");
        }
        frames += 1;

        if args.display {
            display_frame(&emulator.ppu);

            // Sleep to maintain original hardware speed
            let elapsed = last_frame_time.elapsed();
            if elapsed < FRAME_DURATION {
                std::thread::sleep(FRAME_DURATION - elapsed);
            }
            last_frame_time = Instant::now();
        }

        if args.frames.is_some_and(|limit| frames >= limit) {
            info!("Stopping after {} frames", frames);
            break;
        }
    }
}
