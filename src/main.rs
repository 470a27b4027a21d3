use clap::Parser;
use dmg_core::args::Args;

fn main() -> Result<(), std::io::Error> {
    let args = Args::parse();
    dmg_core::rom_exec(args)
}
