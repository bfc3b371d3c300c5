use super::{Fix16, Wide};
use crate::kernel::KERNEL;
use crate::Options;

/// A way of computing `round(a * 65536 / b)` and the remainder of `a / b`.
///
/// Implementations agree bit for bit with overflow detection on: halves round
/// away from zero (or the magnitude is truncated when rounding is off), a zero
/// divisor returns `(Fix16::MINIMUM, true)`, and magnitudes of `2^31` or more
/// overflow.
pub trait DivStrategy {
    const NAME: &'static str;

    fn overflowing_div(
        &self,
        a: Fix16,
        b: Fix16,
        options: Options,
    ) -> (Fix16, bool);

    /// Remainder with the sign of `a`. A zero divisor gives
    /// [`Fix16::MINIMUM`].
    fn rem(&self, a: Fix16, b: Fix16) -> Fix16;
}

/// Composes `(|a| << 17) / |b|` from repeated 32/32 bit hardware divisions.
/// Usually 1-3 of them.
#[derive(Copy, Clone, Debug, Default)]
pub struct HardwareDivide;

impl DivStrategy for HardwareDivide {
    const NAME: &'static str = "hardware";

    fn overflowing_div(
        &self,
        a: Fix16,
        b: Fix16,
        options: Options,
    ) -> (Fix16, bool) {
        if b.0 == 0 {
            return (Fix16::MINIMUM, true);
        }

        let check = options.overflow;

        // Invariant: |a| << 17 == quotient * divider
        //                         + (remainder << bit_pos) + pending
        // with pending < 2^bit_pos.
        let mut remainder = a.magnitude();
        let mut divider = b.magnitude();
        let mut pending: u32 = 0;
        let mut quotient: u64 = 0;
        let mut bit_pos: i32 = 17;

        // Large divisors leave no room for shifting; start from the lower
        // estimate N / ((D >> 17) + 1) instead.
        if divider & 0xFFF0_0000 != 0 {
            let estimate = remainder / ((divider >> 17) + 1);
            let left =
                ((remainder as u64) << 17) - estimate as u64 * divider as u64;

            quotient = estimate as u64;
            remainder = (left >> 17) as u32;
            pending = (left & 0x1_FFFF) as u32;
        }

        while divider & 0xF == 0 && bit_pos >= 4 {
            divider >>= 4;
            pending >>= 4;
            bit_pos -= 4;
        }

        while (remainder != 0 || pending != 0) && bit_pos >= 0 {
            // Shift the remainder as far as it goes without overflowing.
            let shift = (remainder.leading_zeros() as i32).min(bit_pos);
            bit_pos -= shift;

            remainder = (remainder << shift) | (pending >> bit_pos);
            pending &= (1 << bit_pos) - 1;

            let div = remainder / divider;
            remainder %= divider;
            quotient += (div as u64) << bit_pos;

            if check && div & !(u32::MAX >> bit_pos) != 0 {
                return (Fix16::OVERFLOW, true);
            }

            // divider <= 2^31, so the remainder keeps its top bit clear.
            remainder <<= 1;
            bit_pos -= 1;

            if bit_pos >= 0 {
                remainder |= pending >> bit_pos;
                pending &= (1 << bit_pos) - 1;
            }
        }

        if options.rounding {
            quotient += 1;
        }

        let mag = quotient >> 1;
        if check && mag > i32::MAX as u64 {
            return (Fix16::OVERFLOW, true);
        }

        let negative = a.is_negative() != b.is_negative();
        Fix16::from_magnitude(mag as u32, negative, check)
    }

    fn rem(&self, a: Fix16, b: Fix16) -> Fix16 {
        if b.0 == 0 {
            return Fix16::MINIMUM;
        }

        Fix16(a.0.wrapping_rem(b.0))
    }
}

/// Binary restoring division, one quotient bit per step. For cores without a
/// hardware divider.
#[derive(Copy, Clone, Debug, Default)]
pub struct RestoringDivide;

impl DivStrategy for RestoringDivide {
    const NAME: &'static str = "restoring";

    fn overflowing_div(
        &self,
        a: Fix16,
        b: Fix16,
        options: Options,
    ) -> (Fix16, bool) {
        if b.0 == 0 {
            return (Fix16::MINIMUM, true);
        }

        let check = options.overflow;

        let mut remainder = a.magnitude();
        let mut divider = b.magnitude();
        let mut quotient: u32 = 0;
        let mut bit: u32 = 0x1_0000;

        // Requires divider >= remainder.
        while divider < remainder {
            divider <<= 1;
            bit <<= 1;
        }

        if check && bit == 0 {
            return (Fix16::OVERFLOW, true);
        }

        // The only divider with the top bit set is 2^31; one manual step
        // keeps later shifts in range.
        if divider & 0x8000_0000 != 0 {
            if remainder >= divider {
                quotient |= bit;
                remainder -= divider;
            }

            divider >>= 1;
            bit >>= 1;
        }

        while bit != 0 && remainder != 0 {
            if remainder >= divider {
                quotient |= bit;
                remainder -= divider;
            }

            remainder <<= 1;
            bit >>= 1;
        }

        if options.rounding && remainder >= divider {
            let (rounded, carried) = quotient.overflowing_add(1);
            if check && carried {
                return (Fix16::OVERFLOW, true);
            }

            quotient = rounded;
        }

        let negative = a.is_negative() != b.is_negative();
        Fix16::from_magnitude(quotient, negative, check)
    }

    fn rem(&self, a: Fix16, b: Fix16) -> Fix16 {
        let (mut x, y) = (a.0, b.0);

        match y {
            0 => return Fix16::MINIMUM,
            i32::MIN => return if x == i32::MIN { Fix16::ZERO } else { a },
            _ => {}
        }

        let y = y.abs();

        while x >= y {
            x -= y;
        }

        while x <= -y {
            x += y;
        }

        Fix16(x)
    }
}

impl Wide {
    /// Truncating signed division by a word, like `i64::wrapping_div` and
    /// `i64::wrapping_rem`. Built from 32-bit operations only.
    ///
    /// # Panics
    ///
    /// If `d` is zero.
    pub fn div_mod_word(&self, d: i32) -> (Self, i32) {
        assert!(d != 0, "division by zero");

        let n = if self.is_negative() {
            self.wrapping_neg()
        } else {
            *self
        };
        let d_abs = d.unsigned_abs();

        let mut q = Self::zero();
        let mut r: u32 = 0;

        for i in (0..64).rev() {
            let bit = if i >= 32 {
                ((n.hi as u32) >> (i - 32)) & 1
            } else {
                (n.lo >> i) & 1
            };

            // r < d_abs <= 2^31, so this never drops a bit.
            r = (r << 1) | bit;
            q = q << 1;

            if r >= d_abs {
                r -= d_abs;
                q.lo |= 1;
            }
        }

        let q = if self.is_negative() != (d < 0) {
            q.wrapping_neg()
        } else {
            q
        };
        let r = if self.is_negative() {
            (r as i32).wrapping_neg()
        } else {
            r as i32
        };

        (q, r)
    }
}

impl std::ops::Div<i32> for Wide {
    type Output = Self;

    #[inline]
    fn div(self, other: i32) -> Self::Output {
        self.div_mod_word(other).0
    }
}

impl std::ops::Rem<i32> for Wide {
    type Output = i32;

    #[inline]
    fn rem(self, other: i32) -> i32 {
        self.div_mod_word(other).1
    }
}

impl std::ops::Div<Fix16> for Fix16 {
    type Output = Self;

    #[inline]
    fn div(self, other: Self) -> Self::Output {
        KERNEL.div(self, other)
    }
}

impl std::ops::DivAssign<Fix16> for Fix16 {
    #[inline]
    fn div_assign(&mut self, other: Self) {
        *self = KERNEL.div(*self, other);
    }
}

impl std::ops::Rem<Fix16> for Fix16 {
    type Output = Self;

    #[inline]
    fn rem(self, other: Self) -> Self::Output {
        KERNEL.rem(self, other)
    }
}
