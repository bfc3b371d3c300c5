use super::{Fix16, Wide};
use crate::kernel::KERNEL;
use crate::Options;

/// Full 32x32 -> 64 bit unsigned product from 16x16 -> 32 bit pieces,
/// returned as `(hi, lo)`.
#[inline]
fn widening_mul(a: u32, b: u32) -> (u32, u32) {
    let (a1, a0) = (a >> 16, a & 0xFFFF);
    let (b1, b0) = (b >> 16, b & 0xFFFF);

    let p00 = a0 * b0;
    let p11 = a1 * b1;

    // Two cross products can overflow 32 bits together; keep that carry.
    let (mid, mid_carry) = (a0 * b1).overflowing_add(a1 * b0);

    let lo = p00.wrapping_add(mid << 16);
    let lo_carry = (lo < p00) as u32;

    let hi = p11 + (mid >> 16) + ((mid_carry as u32) << 16) + lo_carry;

    (hi, lo)
}

impl Wide {
    /// Exact product of two 32-bit values.
    pub fn mul_i32_i32(a: i32, b: i32) -> Self {
        let (hi, lo) = widening_mul(a as u32, b as u32);

        // The signed product differs from the unsigned one by the other
        // operand shifted 32 bits, once per negative operand.
        let mut hi = hi;
        if a < 0 {
            hi = hi.wrapping_sub(b as u32);
        }
        if b < 0 {
            hi = hi.wrapping_sub(a as u32);
        }

        Self::new(hi as i32, lo)
    }

    /// Low 64 bits of `self * other`, like `i64::wrapping_mul`.
    pub fn wrapping_mul_word(&self, other: i32) -> Self {
        let (hi, lo) = widening_mul(self.lo, other as u32);

        let cross = (self.hi as u32).wrapping_mul(other as u32);
        let mut hi = hi.wrapping_add(cross);
        if other < 0 {
            hi = hi.wrapping_sub(self.lo);
        }

        Self::new(hi as i32, lo)
    }
}

impl std::ops::Mul<i32> for Wide {
    type Output = Self;

    #[inline]
    fn mul(self, other: i32) -> Self::Output {
        self.wrapping_mul_word(other)
    }
}

impl std::ops::MulAssign<i32> for Wide {
    #[inline]
    fn mul_assign(&mut self, other: i32) {
        *self = self.wrapping_mul_word(other);
    }
}

/// A way of computing `round(a * b / 65536)`.
///
/// Every implementation returns the same `(value, overflowed)` pair for the
/// same inputs and options: halves round away from zero (or the result is
/// floored when rounding is off), and overflow is reported exactly when the
/// true product lies outside `[-2^47, 2^47)` or rounds up to `2^31`. An
/// overflowing call returns [`Fix16::OVERFLOW`].
pub trait MulStrategy {
    const NAME: &'static str;

    fn overflowing_mul(
        &self,
        a: Fix16,
        b: Fix16,
        options: Options,
    ) -> (Fix16, bool);
}

/// 32x32 -> 64 bit multiply. Fastest where a native 64-bit product exists
/// (e.g. ARM Cortex-M3).
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeWide;

impl MulStrategy for NativeWide {
    const NAME: &'static str = "native-wide";

    fn overflowing_mul(
        &self,
        a: Fix16,
        b: Fix16,
        options: Options,
    ) -> (Fix16, bool) {
        let mut product = a.0 as i64 * b.0 as i64;

        // The upper 17 bits must all equal the sign.
        if options.overflow && (product >> 47) != (product >> 63) {
            return (Fix16::OVERFLOW, true);
        }

        if !options.rounding {
            return (Fix16((product >> 16) as i32), false);
        }

        // Makes -1/2 round away from zero like +1/2 does.
        if product < 0 {
            product -= 1;
        }

        let result = (product >> 16) + ((product & 0x8000) >> 15);

        if options.overflow && result > i32::MAX as i64 {
            return (Fix16::OVERFLOW, true);
        }

        (Fix16(result as i32), false)
    }
}

/// 16x16 -> 32 bit partial products, for targets without a 64-bit type.
#[derive(Copy, Clone, Debug, Default)]
pub struct Split16;

impl MulStrategy for Split16 {
    const NAME: &'static str = "split-16";

    fn overflowing_mul(
        &self,
        a: Fix16,
        b: Fix16,
        options: Options,
    ) -> (Fix16, bool) {
        //        A B
        //    x   C D
        //    -------
        //        B*D
        //      C*B
        //      A*D
        //    A*C
        //    -------  64 bit product as (hi, lo)
        let a_hi = a.0 >> 16;
        let c_hi = b.0 >> 16;
        let b_lo = a.0 as u32 & 0xFFFF;
        let d_lo = b.0 as u32 & 0xFFFF;

        let ac = a_hi * c_hi;
        let bd = b_lo * d_lo;
        let ad = a_hi * d_lo as i32;
        let cb = c_hi * b_lo as i32;

        // The cross products are added one at a time: their sum may not
        // fit 32 bits.
        let mut hi = ac + (ad >> 16) + (cb >> 16);
        let mut lo = bd;

        for cross in [ad, cb] {
            let (sum, carry) = lo.overflowing_add((cross as u32) << 16);
            lo = sum;
            hi += carry as i32;
        }

        // The upper 17 bits must all equal the sign.
        if options.overflow && hi >> 31 != hi >> 15 {
            return (Fix16::OVERFLOW, true);
        }

        if !options.rounding {
            return (Fix16(hi.wrapping_shl(16) | (lo >> 16) as i32), false);
        }

        let negative = hi < 0;

        // Subtracting 0.5 (and one more unit for negative products) then
        // shifting lands one below the rounded result; the +1 below fixes it.
        let lo_before = lo;
        lo = lo.wrapping_sub(0x8000).wrapping_sub((hi as u32) >> 31);
        if lo > lo_before {
            hi = hi.wrapping_sub(1);
        }

        let result = (hi.wrapping_shl(16) | (lo >> 16) as i32).wrapping_add(1);

        if options.overflow && !negative && result < 0 {
            return (Fix16::OVERFLOW, true);
        }

        (Fix16(result), false)
    }
}

/// 8x8 -> 16 bit partial products over magnitudes, skipping zero bytes.
/// Fastest on 8-bit cores such as AVR.
#[derive(Copy, Clone, Debug, Default)]
pub struct Split8;

impl MulStrategy for Split8 {
    const NAME: &'static str = "split-8";

    fn overflowing_mul(
        &self,
        a: Fix16,
        b: Fix16,
        options: Options,
    ) -> (Fix16, bool) {
        let ua = a.magnitude();
        let ub = b.magnitude();
        let negative = (a.0 >= 0) != (b.0 >= 0);

        let va: [u8; 4] =
            crate::collect_array!(4, |i| { (ua >> (8 * i)) as u8 });
        let vb: [u8; 4] =
            crate::collect_array!(4, |i| { (ub >> (8 * i)) as u8 });

        // Column k of the product sits at bit 8*k and sums va[i]*vb[k-i].
        let column = |k: usize| -> u32 {
            let mut sum = 0;

            for i in k.saturating_sub(3)..=k.min(3) {
                let (x, y) = (va[i], vb[k - i]);
                if x != 0 && y != 0 {
                    sum += x as u32 * y as u32;
                }
            }

            sum
        };

        let check = options.overflow;
        let overflow = (Fix16::OVERFLOW, true);

        // Column 6 alone is past bit 48.
        if check && va[3] != 0 && vb[3] != 0 {
            return overflow;
        }

        // `mid` accumulates the product shifted right by 16.
        let mut mid = (column(5) << 8).wrapping_add(column(4));
        if check && mid & 0xFF00_0000 != 0 {
            return overflow;
        }

        mid = (mid << 8).wrapping_add(column(3));
        if check && mid & 0xFF00_0000 != 0 {
            return overflow;
        }

        let (mid, c0) = (mid << 8).overflowing_add(column(2));
        let low = (column(1) << 8) + column(0);

        // Bias on the discarded 16 bits: round half up, or round the
        // magnitude up for negative results so that truncation floors.
        let bias = if options.rounding {
            0x8000
        } else if negative {
            0xFFFF
        } else {
            0
        };

        let (trunc, c1) = mid.overflowing_add(low >> 16);
        let (mag, c2) = mid.overflowing_add((low + bias) >> 16);

        if check {
            let carried = c0 || c1 || c2;
            let out_of_range = if negative {
                // |product| may reach 2^47 exactly.
                trunc > 0x8000_0000
                    || (trunc == 0x8000_0000 && low & 0xFFFF != 0)
            } else {
                mag & 0x8000_0000 != 0
            };

            if carried || out_of_range {
                return overflow;
            }
        }

        let result = mag as i32;
        if negative {
            (Fix16(result.wrapping_neg()), false)
        } else {
            (Fix16(result), false)
        }
    }
}

impl std::ops::Mul<Fix16> for Fix16 {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self::Output {
        KERNEL.mul(self, other)
    }
}

impl std::ops::MulAssign<Fix16> for Fix16 {
    #[inline]
    fn mul_assign(&mut self, other: Self) {
        *self = KERNEL.mul(*self, other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use quickcheck_macros::quickcheck;
    use rand::Rng;

    const STANDARD: Options = Options::STANDARD;
    const TRUNCATING: Options = Options {
        rounding: false,
        overflow: true,
    };

    fn mul_all(a: i32, b: i32, options: Options) -> [(Fix16, bool); 3] {
        let (a, b) = (Fix16(a), Fix16(b));
        [
            NativeWide.overflowing_mul(a, b, options),
            Split16.overflowing_mul(a, b, options),
            Split8.overflowing_mul(a, b, options),
        ]
    }

    fn assert_all(a: i32, b: i32, options: Options, expected: (Fix16, bool)) {
        for (i, r) in mul_all(a, b, options).into_iter().enumerate() {
            assert_eq!(r, expected, "strategy {i} failed for {a:#x} * {b:#x}");
        }
    }

    /// Rounded quotient of the exact product, halves away from zero.
    fn reference(a: i32, b: i32, options: Options) -> (Fix16, bool) {
        let p = a as i64 * b as i64;
        if p >= 1 << 47 || p < -(1 << 47) {
            return (Fix16::OVERFLOW, true);
        }

        let r = if !options.rounding {
            p >> 16
        } else if p >= 0 {
            (p + 0x8000) >> 16
        } else {
            -((-p + 0x8000) >> 16)
        };

        match i32::try_from(r) {
            Ok(v) => (Fix16(v), false),
            Err(_) => (Fix16::OVERFLOW, true),
        }
    }

    #[test]
    fn multiplies_simple_values() {
        let six = Fix16::from_int(6);
        assert_all(2 << 16, 3 << 16, STANDARD, (six, false));
        assert_all(-2 << 16, 3 << 16, STANDARD, (-six, false));
        assert_all(-2 << 16, -3 << 16, STANDARD, (six, false));
        assert_all(0x18000, 0x18000, STANDARD, (Fix16(0x24000), false));
    }

    #[test]
    fn rounds_halves_away_from_zero() {
        // 1 * 0.5 ulp
        assert_all(1, 0x8000, STANDARD, (Fix16(1), false));
        assert_all(-1, 0x8000, STANDARD, (Fix16(-1), false));
        assert_all(1, 0x7FFF, STANDARD, (Fix16(0), false));
        assert_all(-1, 0x7FFF, STANDARD, (Fix16(0), false));
    }

    #[test]
    fn truncates_toward_negative_infinity() {
        assert_all(1, 0x8000, TRUNCATING, (Fix16(0), false));
        assert_all(-1, 0x8000, TRUNCATING, (Fix16(-1), false));
        assert_all(-1, 1, TRUNCATING, (Fix16(-1), false));
    }

    #[test]
    fn detects_overflow() {
        let overflow = (Fix16::OVERFLOW, true);
        assert_all(Fix16::MAXIMUM.0, 2 << 16, STANDARD, overflow);
        assert_all(Fix16::MINIMUM.0, 2 << 16, STANDARD, overflow);
        assert_all(200 << 16, 200 << 16, STANDARD, overflow);
        assert_all(-200 << 16, 200 << 16, STANDARD, overflow);
        assert_all(Fix16::MINIMUM.0, -1 << 16, STANDARD, overflow);
    }

    #[test]
    fn reaches_the_negative_boundary() {
        // -32768.0 * 1.0 is exactly representable.
        assert_all(
            Fix16::MINIMUM.0,
            Fix16::ONE.0,
            STANDARD,
            (Fix16::MINIMUM, false),
        );
    }

    #[test]
    fn positive_rounding_can_overflow() {
        // (2^47 - 2^15) / 2^16 is MAXIMUM + 0.5.
        let (a, b) = (0x4000_4000, 0x1_FFFE);
        assert_all(a, b, STANDARD, (Fix16::OVERFLOW, true));
        assert_all(a, b, TRUNCATING, (Fix16::MAXIMUM, false));
    }

    #[test]
    fn handles_large_cross_products() {
        // A*D + C*B overflows 32 bits while the product is small.
        let a = i32::MIN + 0xFFFF;
        let b = -1;
        assert_all(a, b, STANDARD, reference(a, b, Options::STANDARD));
        assert_eq!(reference(a, b, Options::STANDARD), (Fix16(0x7FFF), false));
    }

    #[test]
    fn wraps_without_overflow_detection() {
        let unchecked = Options {
            rounding: true,
            overflow: false,
        };
        let two = Fix16(2 << 16);
        let (r, overflow) =
            NativeWide.overflowing_mul(Fix16::MAXIMUM, two, unchecked);
        assert!(!overflow);
        assert_eq!(r, Fix16(-2));
    }

    #[test]
    fn spotcheck_against_reference() {
        let mut rng = rng();

        for _ in 0..10_000 {
            // Mix magnitudes so that both in-range and overflowing products
            // show up.
            let a = rng.gen::<i32>() >> rng.gen_range(0..31);
            let b = rng.gen::<i32>() >> rng.gen_range(0..31);

            for options in [STANDARD, TRUNCATING] {
                let expected = reference(a, b, options);
                assert_all(a, b, options, expected);
            }
        }
    }

    #[quickcheck]
    fn qc_strategies_agree(a: Fix16, b: Fix16) -> bool {
        [STANDARD, TRUNCATING].into_iter().all(|options| {
            let [n, s16, s8] = mul_all(a.0, b.0, options);
            n == s16 && n == s8 && n == reference(a.0, b.0, options)
        })
    }

    #[test]
    fn widening_mul_max() {
        assert_eq!(widening_mul(u32::MAX, u32::MAX), (0xFFFF_FFFE, 1));
        assert_eq!(widening_mul(0x1_0000, 0x1_0000), (1, 0));
    }

    #[quickcheck]
    fn qc_widening_mul_matches_u64(a: u32, b: u32) -> bool {
        let (hi, lo) = widening_mul(a, b);
        ((hi as u64) << 32 | lo as u64) == a as u64 * b as u64
    }

    #[quickcheck]
    fn qc_mul_i32_matches_i64(a: i32, b: i32) -> bool {
        Wide::mul_i32_i32(a, b).to_i64() == a as i64 * b as i64
    }

    #[quickcheck]
    fn qc_mul_word_matches_i64(n: i64, m: i32) -> bool {
        (Wide::from_i64(n) * m).to_i64() == n.wrapping_mul(m as i64)
    }

    #[test]
    fn implements_operators() {
        let mut n = Wide::from(-3);
        n *= 1 << 20;
        assert_eq!(n, Wide::from(-3 << 20));
        assert_eq!((Wide::from(1 << 30) * 8).to_i64(), 1 << 33);
    }
}
