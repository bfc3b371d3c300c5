use crate::{DivStrategy, FailureHook, Fix16, Kernel, MulStrategy, Wide};

/// `(value, overflowed)` for a wide result that must fit 32 bits.
#[inline]
fn narrow(n: Wide) -> (Fix16, bool) {
    match n.to_i32() {
        Some(v) => (Fix16(v), false),
        None => (Fix16::OVERFLOW, true),
    }
}

#[inline]
fn fits_bits(n: i32, bits: u32) -> bool {
    let limit = 1 << (bits - 1);
    (-limit..limit).contains(&n)
}

/// Extended-precision helpers. Each one calls the failure hook with the
/// caller's location and returns [`Fix16::OVERFLOW`] when its result does not
/// fit or its divisor is zero.
impl<M: MulStrategy, D: DivStrategy, H: FailureHook> Kernel<M, D, H> {
    /// `a * b` for an integer `b`.
    #[track_caller]
    pub fn amul_int32(&self, a: Fix16, b: i32) -> Fix16 {
        crate::fatal_check!(&self.hook, narrow(Wide::mul_i32_i32(a.0, b)))
    }

    /// `a * b / c` with a 64-bit intermediate, truncating toward zero.
    #[track_caller]
    pub fn axb_c(&self, a: Fix16, b: i32, c: i32) -> Fix16 {
        crate::fatal_check!(&self.hook, {
            if c == 0 {
                (Fix16::OVERFLOW, true)
            } else {
                narrow(Wide::mul_i32_i32(a.0, b) / c)
            }
        })
    }

    /// `a / b` for integers, as a fixed-point value: bits 16..48 of
    /// `(a << 32) / b`.
    #[track_caller]
    pub fn div_big_int(&self, a: i32, b: i32) -> Fix16 {
        crate::fatal_check!(&self.hook, {
            if b == 0 {
                (Fix16::OVERFLOW, true)
            } else {
                let q = Wide::new(a, 0) / b;

                if fits_bits(q.hi, 16) {
                    (Fix16((q.hi << 16) | (q.lo >> 16) as i32), false)
                } else {
                    (Fix16::OVERFLOW, true)
                }
            }
        })
    }

    /// Bits 8..40 of `((hi:lo) << 24) / b`.
    #[track_caller]
    pub fn div_huge_int(&self, hi: i32, lo: u32, b: i32) -> Fix16 {
        crate::fatal_check!(&self.hook, {
            // The shift must not push bits out of 64.
            if b == 0 || !fits_bits(hi, 8) {
                (Fix16::OVERFLOW, true)
            } else {
                let q = (Wide::new(hi, lo) << 24) / b;

                if fits_bits(q.hi, 8) {
                    (Fix16((q.hi << 24) | (q.lo >> 8) as i32), false)
                } else {
                    (Fix16::OVERFLOW, true)
                }
            }
        })
    }

    #[track_caller]
    pub fn aadd(&self, a: Fix16, b: Fix16) -> Fix16 {
        crate::fatal_check!(&self.hook, self.overflowing_add(a, b))
    }

    #[track_caller]
    pub fn asub(&self, a: Fix16, b: Fix16) -> Fix16 {
        crate::fatal_check!(&self.hook, self.overflowing_sub(a, b))
    }

    #[track_caller]
    pub fn amul(&self, a: Fix16, b: Fix16) -> Fix16 {
        crate::fatal_check!(&self.hook, self.overflowing_mul(a, b))
    }

    #[track_caller]
    pub fn adiv(&self, a: Fix16, b: Fix16) -> Fix16 {
        crate::fatal_check!(&self.hook, self.overflowing_div(a, b))
    }
}
