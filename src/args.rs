use std::path::PathBuf;

use clap::Parser;

/// Runs a Game Boy ROM on the DMG core.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the .gb ROM image
    #[arg(long)]
    pub load_rom: PathBuf,

    // Optional log path, if none given, logs go to stderr.
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Stop after this many frames. Runs forever when omitted.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Draw each frame to the terminal with ANSI colors.
    #[arg(long)]
    pub display: bool,

    // Run for a predeterminate amount of instructions for Game Boy Doctor emulator test.
    // Provide the number of log lines, or CPU instructions the game expects to verify.
    #[arg(long)]
    pub debug_doctor: Option<usize>,
}
