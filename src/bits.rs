use crate::Wide;

impl Wide {
    /// Logical shift left; shifts of 64 or more give zero.
    pub fn shl_wide(&self, shift: u32) -> Self {
        match shift {
            0 => *self,
            1..=31 => {
                let comp = 32 - shift;
                let hi = ((self.hi as u32) << shift) | (self.lo >> comp);

                Self::new(hi as i32, self.lo << shift)
            }
            32..=63 => Self::new((self.lo << (shift - 32)) as i32, 0),
            _ => Self::zero(),
        }
    }

    /// Arithmetic shift right; shifts of 64 or more give the sign fill.
    pub fn shr_wide(&self, shift: u32) -> Self {
        let fill = self.hi >> 31;

        match shift {
            0 => *self,
            1..=31 => {
                let comp = 32 - shift;
                let lo = (self.lo >> shift) | ((self.hi as u32) << comp);

                Self::new(self.hi >> shift, lo)
            }
            32..=63 => Self::new(fill, (self.hi >> (shift - 32)) as u32),
            _ => Self::new(fill, fill as u32),
        }
    }

    /// Shifts left for positive `shift`, right (arithmetic) for negative.
    pub fn shift(&self, shift: i32) -> Self {
        if shift >= 0 {
            self.shl_wide(shift as u32)
        } else {
            self.shr_wide(shift.unsigned_abs())
        }
    }

    pub fn leading_zeros(&self) -> u32 {
        if self.hi != 0 {
            self.hi.leading_zeros()
        } else {
            32 + self.lo.leading_zeros()
        }
    }
}

impl std::ops::Shl<u32> for Wide {
    type Output = Self;

    fn shl(self, rhs: u32) -> Self::Output {
        self.shl_wide(rhs)
    }
}

impl std::ops::Shr<u32> for Wide {
    type Output = Self;

    fn shr(self, rhs: u32) -> Self::Output {
        self.shr_wide(rhs)
    }
}
