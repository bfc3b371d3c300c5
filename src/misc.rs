use std::cmp::Ordering;

use super::{Fix16, Wide};

impl Fix16 {
    pub const FRAC_BITS: u32 = 16;

    pub const MAXIMUM: Self = Self(i32::MAX);
    pub const MINIMUM: Self = Self(i32::MIN);

    /// Returned by every operation that overflows. Bit-identical to
    /// [`Fix16::MINIMUM`]: a returned minimum is ambiguous.
    pub const OVERFLOW: Self = Self::MINIMUM;

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << Self::FRAC_BITS);
    pub const HALF: Self = Self(1 << (Self::FRAC_BITS - 1));

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Scales an integer by 65536, wrapping outside -32768..=32767.
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self(n.wrapping_mul(Self::ONE.0))
    }

    /// Nearest integer, halves away from zero.
    pub const fn to_int(self) -> i32 {
        if !crate::overflow::ROUNDING {
            return self.0 >> Self::FRAC_BITS;
        }

        // Computed on i64 so that values next to the extremes can't wrap.
        let v = self.0 as i64;
        let half = Self::HALF.0 as i64;
        let one = Self::ONE.0 as i64;

        if v >= 0 {
            ((v + half) / one) as i32
        } else {
            ((v - half) / one) as i32
        }
    }

    /// `abs(MINIMUM) == MINIMUM`.
    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// Magnitude of the raw value; `MINIMUM` maps to `2^31`.
    #[inline]
    pub(crate) const fn magnitude(self) -> u32 {
        self.0.unsigned_abs()
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Restores a sign on a magnitude. Magnitudes that don't fit (including
    /// `2^31` for negative results) report overflow.
    #[inline]
    pub(crate) fn from_magnitude(
        mag: u32,
        negative: bool,
        check: bool,
    ) -> (Self, bool) {
        if check && mag > i32::MAX as u32 {
            return (Self::OVERFLOW, true);
        }

        let value = mag as i32;
        if negative {
            (Self(value.wrapping_neg()), false)
        } else {
            (Self(value), false)
        }
    }
}

impl From<i16> for Fix16 {
    #[inline]
    fn from(n: i16) -> Self {
        Self::from_int(n as i32)
    }
}

impl Wide {
    pub const MAX: Self = Self::new(i32::MAX, u32::MAX);
    pub const MIN: Self = Self::new(i32::MIN, 0);

    #[inline]
    pub const fn new(hi: i32, lo: u32) -> Self {
        Self { hi, lo }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    pub const fn one() -> Self {
        Self::new(0, 1)
    }

    /// Sign-extends a 32-bit value.
    #[inline]
    pub const fn from_i32(n: i32) -> Self {
        Self::new(n >> 31, n as u32)
    }

    pub fn is_zero(&self) -> bool {
        self.hi == 0 && self.lo == 0
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.hi < 0
    }

    /// Low word reinterpreted as `i32`, if `hi` is its sign extension.
    #[inline]
    pub fn to_i32(&self) -> Option<i32> {
        let lo = self.lo as i32;

        if self.hi == lo >> 31 {
            Some(lo)
        } else {
            None
        }
    }
}

impl From<i32> for Wide {
    #[inline]
    fn from(n: i32) -> Self {
        Self::from_i32(n)
    }
}

fn compare(a: &Wide, b: &Wide) -> Ordering {
    a.hi.cmp(&b.hi).then(a.lo.cmp(&b.lo))
}

impl std::cmp::PartialOrd for Wide {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(compare(self, other))
    }
}

impl std::cmp::Ord for Wide {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}
