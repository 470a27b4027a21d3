use super::error::LoadError;
use crate::constants::{GAME_BOY_FILE_EXT, MEMORY_SIZE};
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Reads a ROM image from disk. Only the extension is checked, the bytes are
/// handed over untouched.
pub fn load_rom(path: &Path) -> Result<Vec<u8>, LoadError> {
    check_extension(path)?;

    let buffer = fs::read(path)?;
    if buffer.is_empty() {
        return Err(LoadError::EmptyRom);
    }
    if buffer.len() > MEMORY_SIZE {
        warn!(
            "ROM is {} bytes, only the first {} are addressable without a bank controller",
            buffer.len(),
            MEMORY_SIZE
        );
    }
    info!("Loaded ROM {:?} ({} bytes)", path, buffer.len());

    Ok(buffer)
}

fn check_extension(path: &Path) -> Result<(), LoadError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(LoadError::MissingExtension)?;

    if ext.eq_ignore_ascii_case(GAME_BOY_FILE_EXT) {
        Ok(())
    } else {
        Err(LoadError::InvalidExtension {
            expected: GAME_BOY_FILE_EXT,
            found: ext.to_string(),
        })
    }
}
