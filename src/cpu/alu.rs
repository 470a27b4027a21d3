use super::flags::Flags;

/// Represents an Arithmic operation, and it's result
/// The purpose is to make the underlying operations pure.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AluOutput {
    pub value: u8,
    pub z: bool,
    pub n: bool,
    pub h: bool,
    pub c: bool,
}

impl AluOutput {
    pub fn flags(&self) -> Flags {
        Flags::new(self.z, self.n, self.h, self.c)
    }

    pub fn alu_8bit_add(a: u8, b: u8, carry: bool) -> Self {
        let c_in = carry as u8;

        let res = (a as u16) + (b as u16) + (c_in as u16);
        let res_u8 = res as u8;

        // Half-Carry: Carry out of bit 3 into bit 4
        // We check if the sum of the lower nibbles exceeds 0xF
        let h_bit = (a & 0x0F) + (b & 0x0F) + c_in > 0x0F;

        AluOutput {
            value: res_u8,
            z: res_u8 == 0,
            n: false,
            h: h_bit,
            c: res > 0xFF,
        }
    }

    pub fn alu_8bit_sub(a: u8, b: u8, carry: bool) -> Self {
        let c_in = carry as u8;

        let res = (a as i16) - (b as i16) - (c_in as i16);
        let res_u8 = res as u8;

        // Half-Carry (Half-Borrow): borrow into bit 4.
        let h_bit = (a & 0x0F) < (b & 0x0F) + c_in;

        // Carry (Borrow): Set if the result is negative (a borrow from bit 8)
        let c_bit = (a as u16) < (b as u16) + (c_in as u16);

        AluOutput {
            value: res_u8,
            z: res_u8 == 0,
            n: true,
            h: h_bit,
            c: c_bit,
        }
    }

    pub fn alu_and(a: u8, b: u8) -> Self {
        let value = a & b;
        // H is always set, a hardware quirk.
        AluOutput {
            value,
            z: value == 0,
            n: false,
            h: true,
            c: false,
        }
    }

    pub fn alu_or(a: u8, b: u8) -> Self {
        let value = a | b;
        AluOutput {
            value,
            z: value == 0,
            n: false,
            h: false,
            c: false,
        }
    }

    pub fn alu_xor(a: u8, b: u8) -> Self {
        let value = a ^ b;
        AluOutput {
            value,
            z: value == 0,
            n: false,
            h: false,
            c: false,
        }
    }

    /// INC leaves C alone, so the incoming carry is passed through.
    pub fn alu_8bit_inc(value: u8, carry: bool) -> Self {
        let res = value.wrapping_add(1);
        AluOutput {
            value: res,
            z: res == 0,
            n: false,
            h: (value & 0x0F) == 0x0F,
            c: carry,
        }
    }

    /// DEC leaves C alone, so the incoming carry is passed through.
    pub fn alu_8bit_dec(value: u8, carry: bool) -> Self {
        let res = value.wrapping_sub(1);

        // Half-Carry: Set if there was a borrow from bit 4
        // (i.e., the lower nibble was 0x0 before the decrement)
        AluOutput {
            value: res,
            z: res == 0,
            n: true,
            h: (value & 0x0F) == 0,
            c: carry,
        }
    }

    pub fn rlc(value: u8) -> Self {
        Self::shifted(value.rotate_left(1), value & 0x80 != 0)
    }

    pub fn rrc(value: u8) -> Self {
        Self::shifted(value.rotate_right(1), value & 0x01 != 0)
    }

    pub fn rl(value: u8, carry: bool) -> Self {
        Self::shifted((value << 1) | carry as u8, value & 0x80 != 0)
    }

    pub fn rr(value: u8, carry: bool) -> Self {
        Self::shifted((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0)
    }

    pub fn sla(value: u8) -> Self {
        Self::shifted(value << 1, value & 0x80 != 0)
    }

    /// Arithmetic shift, bit 7 is kept.
    pub fn sra(value: u8) -> Self {
        Self::shifted((value >> 1) | (value & 0x80), value & 0x01 != 0)
    }

    pub fn srl(value: u8) -> Self {
        Self::shifted(value >> 1, value & 0x01 != 0)
    }

    pub fn swap(value: u8) -> Self {
        Self::shifted(value.rotate_left(4), false)
    }

    fn shifted(value: u8, carry_out: bool) -> Self {
        AluOutput {
            value,
            z: value == 0,
            n: false,
            h: false,
            c: carry_out,
        }
    }

    /// Decimal adjust of A after a BCD addition or subtraction.
    pub fn daa(a: u8, flags: Flags) -> Self {
        let mut adjust = 0;
        let mut carry = flags.c;
        let value = if flags.n {
            if flags.h {
                adjust |= 0x06;
            }
            if flags.c {
                adjust |= 0x60;
            }
            a.wrapping_sub(adjust)
        } else {
            if flags.h || (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if flags.c || a > 0x99 {
                adjust |= 0x60;
                carry = true;
            }
            a.wrapping_add(adjust)
        };
        AluOutput {
            value,
            z: value == 0,
            n: flags.n,
            h: false,
            c: carry,
        }
    }
}

/// Result of a 16-bit addition. Z is never touched by these.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Alu16Output {
    pub value: u16,
    pub h: bool,
    pub c: bool,
}

impl Alu16Output {
    /// ADD HL,rr as the hardware does it: the low bytes first, then the high
    /// bytes with the carry from the low half. H and C come from the high half.
    pub fn add_hl(hl: u16, value: u16) -> Self {
        let [hl_high, hl_low] = hl.to_be_bytes();
        let [v_high, v_low] = value.to_be_bytes();
        let low = AluOutput::alu_8bit_add(hl_low, v_low, false);
        let high = AluOutput::alu_8bit_add(hl_high, v_high, low.c);
        Alu16Output {
            value: u16::from_be_bytes([high.value, low.value]),
            h: high.h,
            c: high.c,
        }
    }

    /// SP plus a signed offset (ADD SP,e8 and LD HL,SP+e8).
    /// H and C come from the unsigned low byte addition.
    pub fn add_sp_offset(sp: u16, offset: u8) -> Self {
        let low = AluOutput::alu_8bit_add(sp as u8, offset, false);
        Alu16Output {
            value: sp.wrapping_add_signed(offset as i8 as i16),
            h: low.h,
            c: low.c,
        }
    }
}
