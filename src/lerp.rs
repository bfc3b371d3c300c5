use super::{Fix16, Wide};

impl Fix16 {
    /// `(self * (256 - frac) + other * frac) >> 8`, exact through [`Wide`].
    pub fn lerp8(self, other: Self, frac: u8) -> Self {
        let frac = frac as i32;
        let sum = Wide::mul_i32_i32(self.0, 256 - frac)
            + Wide::mul_i32_i32(other.0, frac);

        Self((sum >> 8).lo as i32)
    }

    /// `(self * (65536 - frac) + other * frac) >> 16`, exact through [`Wide`].
    pub fn lerp16(self, other: Self, frac: u16) -> Self {
        let frac = frac as i32;
        let sum = Wide::mul_i32_i32(self.0, 65536 - frac)
            + Wide::mul_i32_i32(other.0, frac);

        Self((sum >> 16).lo as i32)
    }

    /// High word of `self * (2^32 - frac) + other * frac`.
    pub fn lerp32(self, other: Self, frac: u32) -> Self {
        if frac == 0 {
            return self;
        }

        let frac = Wide::new(0, frac);
        let rest = Wide::new(1, 0) - frac;

        let sum =
            rest.wrapping_mul_word(self.0) + frac.wrapping_mul_word(other.0);

        Self(sum.hi)
    }
}
