mod joypad;

pub use joypad::{Button, Direction, Joypad};
