use std::fmt;

/// Branch conditions tested by JR, JP, CALL and RET.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Condition {
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Condition::NotZero => "NZ",
            Condition::Zero => "Z",
            Condition::NotCarry => "NC",
            Condition::Carry => "C",
        };
        write!(f, "{}", s)
    }
}
