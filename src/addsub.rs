use super::{Fix16, Wide};
use crate::kernel::KERNEL;

const SIGN: u32 = 0x8000_0000;

impl Fix16 {
    #[inline]
    pub const fn overflowing_add(self, other: Self) -> (Self, bool) {
        // Unsigned so that the wraparound is well defined.
        let a = self.0 as u32;
        let b = other.0 as u32;
        let sum = a.wrapping_add(b);

        // Overflow needs equal operand signs and a sum of the other sign.
        let overflow = (a ^ b) & SIGN == 0 && (a ^ sum) & SIGN != 0;

        (Self(sum as i32), overflow)
    }

    #[inline]
    pub const fn overflowing_sub(self, other: Self) -> (Self, bool) {
        let a = self.0 as u32;
        let b = other.0 as u32;
        let diff = a.wrapping_sub(b);

        // Overflow needs different operand signs and a difference whose sign
        // differs from the minuend.
        let overflow = (a ^ b) & SIGN != 0 && (a ^ diff) & SIGN != 0;

        (Self(diff as i32), overflow)
    }
}

impl Wide {
    #[inline]
    pub fn overflowing_add(&self, other: &Self) -> (Self, bool) {
        let lo = self.lo.wrapping_add(other.lo);
        let carry = (lo < self.lo) as i32;

        // Wrapping twice lands back in range.
        let (hi, o1) = self.hi.overflowing_add(other.hi);
        let (hi, o2) = hi.overflowing_add(carry);

        (Self::new(hi, lo), o1 != o2)
    }

    #[inline]
    pub fn borrowing_sub(&self, other: &Self) -> (Self, bool) {
        let lo = self.lo.wrapping_sub(other.lo);
        let borrow = (self.lo < other.lo) as i32;

        let (hi, o1) = self.hi.overflowing_sub(other.hi);
        let (hi, o2) = hi.overflowing_sub(borrow);

        (Self::new(hi, lo), o1 != o2)
    }

    #[inline]
    pub fn wrapping_neg(&self) -> Self {
        Self::zero().borrowing_sub(self).0
    }
}

impl std::ops::Add<Wide> for Wide {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self::Output {
        self.overflowing_add(&other).0
    }
}

impl std::ops::Sub<Wide> for Wide {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self::Output {
        self.borrowing_sub(&other).0
    }
}

impl std::ops::Neg for Wide {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.wrapping_neg()
    }
}

impl std::ops::Add<Fix16> for Fix16 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self::Output {
        KERNEL.add(self, other)
    }
}

impl std::ops::AddAssign<Fix16> for Fix16 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = KERNEL.add(*self, other);
    }
}

impl std::ops::Sub<Fix16> for Fix16 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self::Output {
        KERNEL.sub(self, other)
    }
}

impl std::ops::SubAssign<Fix16> for Fix16 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = KERNEL.sub(*self, other);
    }
}

impl std::ops::Neg for Fix16 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(self.0.wrapping_neg())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Fix16, Wide};
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    #[test]
    fn add_without_overflow() {
        let (sum, overflow) =
            Fix16::from_int(3).overflowing_add(Fix16::from_int(-5));
        assert_eq!(sum, Fix16::from_int(-2));
        assert!(!overflow);
    }

    #[test]
    fn add_with_overflow() {
        let (_, overflow) = Fix16::MAXIMUM.overflowing_add(Fix16(1));
        assert!(overflow);

        let (_, overflow) = Fix16::MINIMUM.overflowing_add(Fix16(-1));
        assert!(overflow);
    }

    #[test]
    fn sub_with_overflow() {
        let (_, overflow) = Fix16::MINIMUM.overflowing_sub(Fix16(1));
        assert!(overflow);

        let (_, overflow) = Fix16::ZERO.overflowing_sub(Fix16::MINIMUM);
        assert!(overflow);

        let (diff, overflow) = Fix16(-1).overflowing_sub(Fix16::MAXIMUM);
        assert_eq!(diff, Fix16::MINIMUM);
        assert!(!overflow);
    }

    #[cfg(not(feature = "no-overflow"))]
    #[test]
    fn implements_operators() {
        let mut n = Fix16::from_int(2) + Fix16::HALF;
        assert_eq!(n, Fix16(0x28000));

        n -= Fix16::ONE;
        assert_eq!(n, Fix16(0x18000));

        assert_eq!(Fix16::MAXIMUM + Fix16::ONE, Fix16::OVERFLOW);
        assert_eq!(-Fix16::ONE, Fix16::from_int(-1));
    }

    #[quickcheck]
    fn qc_add_matches_exact_sum(a: i32, b: i32) -> bool {
        let exact = a as i64 + b as i64;
        let (sum, overflow) = Fix16(a).overflowing_add(Fix16(b));

        match i32::try_from(exact) {
            Ok(v) => sum.0 == v && !overflow,
            Err(_) => overflow,
        }
    }

    #[quickcheck]
    fn qc_sub_matches_exact_difference(a: i32, b: i32) -> bool {
        let exact = a as i64 - b as i64;
        let (diff, overflow) = Fix16(a).overflowing_sub(Fix16(b));

        match i32::try_from(exact) {
            Ok(v) => diff.0 == v && !overflow,
            Err(_) => overflow,
        }
    }

    #[test]
    fn wide_add_carries() {
        let (sum, overflow) =
            Wide::new(0, u32::MAX).overflowing_add(&Wide::one());
        assert_eq!(sum, Wide::new(1, 0));
        assert!(!overflow);

        let (_, overflow) = Wide::MAX.overflowing_add(&Wide::one());
        assert!(overflow);
    }

    #[test]
    fn wide_sub_borrows() {
        let (diff, overflow) = Wide::new(1, 0).borrowing_sub(&Wide::one());
        assert_eq!(diff, Wide::new(0, u32::MAX));
        assert!(!overflow);

        let (_, overflow) = Wide::MIN.borrowing_sub(&Wide::one());
        assert!(overflow);
    }

    #[test]
    fn wide_negates() {
        assert_eq!(-Wide::from(5), Wide::from(-5));
        assert_eq!(-Wide::MIN, Wide::MIN);
        assert_eq!(-Wide::zero(), Wide::zero());
    }

    #[quickcheck]
    fn qc_wide_add_matches_i64(a: i64, b: i64) -> bool {
        let (sum, overflow) =
            Wide::from_i64(a).overflowing_add(&Wide::from_i64(b));
        (sum.to_i64(), overflow) == a.overflowing_add(b)
    }

    #[quickcheck]
    fn qc_wide_sub_matches_i64(a: i64, b: i64) -> bool {
        let (diff, overflow) =
            Wide::from_i64(a).borrowing_sub(&Wide::from_i64(b));
        (diff.to_i64(), overflow) == a.overflowing_sub(b)
    }

    #[quickcheck]
    fn qc_wide_sub_from_sum(a: Wide, b: Wide) -> TestResult {
        let (sum, _) = a.overflowing_add(&b);
        let (sub, _) = sum.borrowing_sub(&a);

        TestResult::from_bool(sub == b)
    }
}
