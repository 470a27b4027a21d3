mod address_space;
mod memory_trait;

pub use address_space::AddressSpace;
pub use memory_trait::Memory;
