use std::fmt;

use crate::constants::*;

/// The four condition flags. Packed into F as bits 7-4, the low nibble is
/// always zero.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Flags {
    pub z: bool,
    pub n: bool,
    pub h: bool,
    pub c: bool,
}

impl Flags {
    pub fn new(z: bool, n: bool, h: bool, c: bool) -> Self {
        Self { z, n, h, c }
    }

    pub fn to_byte(self) -> u8 {
        let mut f = 0;
        if self.z {
            f |= FLAG_Z;
        }
        if self.n {
            f |= FLAG_N;
        }
        if self.h {
            f |= FLAG_H;
        }
        if self.c {
            f |= FLAG_C;
        }
        f
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            z: byte & FLAG_Z != 0,
            n: byte & FLAG_N != 0,
            h: byte & FLAG_H != 0,
            c: byte & FLAG_C != 0,
        }
    }
}

impl From<u8> for Flags {
    fn from(byte: u8) -> Self {
        Flags::from_byte(byte)
    }
}

impl From<Flags> for u8 {
    fn from(flags: Flags) -> Self {
        flags.to_byte()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format Flags: [ZNHC] (uppercase if set, dash if clear)
        let z = if self.z { 'Z' } else { '-' };
        let n = if self.n { 'N' } else { '-' };
        let h = if self.h { 'H' } else { '-' };
        let c = if self.c { 'C' } else { '-' };
        write!(f, "[{}{}{}{}]", z, n, h, c)
    }
}
