mod condition;
mod decode;
mod instruction;
mod reg16;
mod reg8;
mod target;

pub use condition::Condition;
pub use decode::{decode, decode_cb};
pub use instruction::{AluOp, Instruction, ShiftOp};
pub use reg8::Reg8;
pub use reg16::Reg16;
pub use target::Target;
