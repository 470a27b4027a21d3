mod error;
mod loader;

pub use error::LoadError;
pub use loader::load_rom;
