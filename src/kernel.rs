use crate::{
    ArithmeticError, DivStrategy, FailureHook, Fix16, HardwareDivide, LogHook,
    MulStrategy, NativeWide, Options, RestoringDivide, Split16, Split8,
};

/// One multiply strategy, one divide strategy, a failure hook and the
/// options they run with.
///
/// The plain operations (`add`, `mul`, ...) return [`Fix16::OVERFLOW`] on
/// overflow when `options.overflow` is set, and wrap otherwise. The
/// `overflowing_*`, `checked_*` and saturating operations always detect
/// overflow. None of them call the hook; only the `a*` helpers do.
#[derive(Copy, Clone, Debug, Default)]
pub struct Kernel<M, D, H = LogHook> {
    pub(crate) mul: M,
    pub(crate) div: D,
    pub(crate) hook: H,
    pub(crate) options: Options,
}

#[cfg(feature = "optimize-8bit")]
pub type DefaultMul = Split8;

#[cfg(all(feature = "no-64bit", not(feature = "optimize-8bit")))]
pub type DefaultMul = Split16;

#[cfg(not(any(feature = "no-64bit", feature = "optimize-8bit")))]
pub type DefaultMul = NativeWide;

#[cfg(feature = "no-hard-division")]
pub type DefaultDiv = RestoringDivide;

#[cfg(not(feature = "no-hard-division"))]
pub type DefaultDiv = HardwareDivide;

pub type DefaultKernel = Kernel<DefaultMul, DefaultDiv, LogHook>;

/// The kernel selected by Cargo features. The `std::ops` operators on
/// [`Fix16`] use it.
pub const KERNEL: DefaultKernel =
    Kernel::new(DefaultMul {}, DefaultDiv {}, LogHook, Options::DEFAULT);

impl<M, D, H> Kernel<M, D, H> {
    pub const fn new(mul: M, div: D, hook: H, options: Options) -> Self {
        Self {
            mul,
            div,
            hook,
            options,
        }
    }

    #[inline]
    pub const fn options(&self) -> Options {
        self.options
    }

    #[inline]
    pub fn hook(&self) -> &H {
        &self.hook
    }
}

#[inline]
fn sentinel((result, overflow): (Fix16, bool)) -> (Fix16, bool) {
    if overflow {
        (Fix16::OVERFLOW, true)
    } else {
        (result, false)
    }
}

#[inline]
fn checked(
    (result, overflow): (Fix16, bool),
) -> Result<Fix16, ArithmeticError> {
    if overflow {
        Err(ArithmeticError::Overflow)
    } else {
        Ok(result)
    }
}

impl<M: MulStrategy, D: DivStrategy, H: FailureHook> Kernel<M, D, H> {
    #[inline]
    pub fn overflowing_add(&self, a: Fix16, b: Fix16) -> (Fix16, bool) {
        sentinel(a.overflowing_add(b))
    }

    #[inline]
    pub fn overflowing_sub(&self, a: Fix16, b: Fix16) -> (Fix16, bool) {
        sentinel(a.overflowing_sub(b))
    }

    #[inline]
    pub fn overflowing_mul(&self, a: Fix16, b: Fix16) -> (Fix16, bool) {
        self.mul.overflowing_mul(a, b, self.options.with_overflow())
    }

    /// Division by zero reports `(Fix16::MINIMUM, true)`.
    #[inline]
    pub fn overflowing_div(&self, a: Fix16, b: Fix16) -> (Fix16, bool) {
        self.div.overflowing_div(a, b, self.options.with_overflow())
    }

    pub fn add(&self, a: Fix16, b: Fix16) -> Fix16 {
        if self.options.overflow {
            self.overflowing_add(a, b).0
        } else {
            a.overflowing_add(b).0
        }
    }

    pub fn sub(&self, a: Fix16, b: Fix16) -> Fix16 {
        if self.options.overflow {
            self.overflowing_sub(a, b).0
        } else {
            a.overflowing_sub(b).0
        }
    }

    #[inline]
    pub fn mul(&self, a: Fix16, b: Fix16) -> Fix16 {
        self.mul.overflowing_mul(a, b, self.options).0
    }

    /// Division by zero returns [`Fix16::MINIMUM`].
    #[inline]
    pub fn div(&self, a: Fix16, b: Fix16) -> Fix16 {
        self.div.overflowing_div(a, b, self.options).0
    }

    /// Remainder with the sign of `a`; [`Fix16::MINIMUM`] for `b == 0`.
    #[doc(alias = "mod")]
    #[inline]
    pub fn rem(&self, a: Fix16, b: Fix16) -> Fix16 {
        self.div.rem(a, b)
    }

    pub fn sadd(&self, a: Fix16, b: Fix16) -> Fix16 {
        match a.overflowing_add(b) {
            (_, true) if a.is_negative() => Fix16::MINIMUM,
            (_, true) => Fix16::MAXIMUM,
            (sum, false) => sum,
        }
    }

    pub fn ssub(&self, a: Fix16, b: Fix16) -> Fix16 {
        match a.overflowing_sub(b) {
            (_, true) if a.is_negative() => Fix16::MINIMUM,
            (_, true) => Fix16::MAXIMUM,
            (diff, false) => diff,
        }
    }

    /// Saturates to [`Fix16::MAXIMUM`] when the operand signs agree and to
    /// [`Fix16::MINIMUM`] otherwise.
    pub fn smul(&self, a: Fix16, b: Fix16) -> Fix16 {
        match self.overflowing_mul(a, b) {
            (_, true) => saturate(a, b),
            (product, false) => product,
        }
    }

    /// Like [`Kernel::smul`]; a zero divisor saturates by the sign of `a`.
    pub fn sdiv(&self, a: Fix16, b: Fix16) -> Fix16 {
        match self.overflowing_div(a, b) {
            (_, true) => saturate(a, b),
            (quotient, false) => quotient,
        }
    }

    pub fn checked_add(
        &self,
        a: Fix16,
        b: Fix16,
    ) -> Result<Fix16, ArithmeticError> {
        checked(self.overflowing_add(a, b))
    }

    pub fn checked_sub(
        &self,
        a: Fix16,
        b: Fix16,
    ) -> Result<Fix16, ArithmeticError> {
        checked(self.overflowing_sub(a, b))
    }

    pub fn checked_mul(
        &self,
        a: Fix16,
        b: Fix16,
    ) -> Result<Fix16, ArithmeticError> {
        checked(self.overflowing_mul(a, b))
    }

    pub fn checked_div(
        &self,
        a: Fix16,
        b: Fix16,
    ) -> Result<Fix16, ArithmeticError> {
        if b == Fix16::ZERO {
            return Err(ArithmeticError::DivisionByZero);
        }

        checked(self.overflowing_div(a, b))
    }

    pub fn checked_rem(
        &self,
        a: Fix16,
        b: Fix16,
    ) -> Result<Fix16, ArithmeticError> {
        if b == Fix16::ZERO {
            return Err(ArithmeticError::DivisionByZero);
        }

        Ok(self.rem(a, b))
    }

    #[inline]
    pub fn sqrt(&self, x: Fix16) -> Fix16 {
        crate::sqrt::sqrt(x, self.options.rounding)
    }
}

#[inline]
fn saturate(a: Fix16, b: Fix16) -> Fix16 {
    if a.is_negative() == b.is_negative() {
        Fix16::MAXIMUM
    } else {
        Fix16::MINIMUM
    }
}

impl Fix16 {
    #[inline]
    pub fn sadd(self, other: Self) -> Self {
        KERNEL.sadd(self, other)
    }

    #[inline]
    pub fn ssub(self, other: Self) -> Self {
        KERNEL.ssub(self, other)
    }

    #[inline]
    pub fn smul(self, other: Self) -> Self {
        KERNEL.smul(self, other)
    }

    #[inline]
    pub fn sdiv(self, other: Self) -> Self {
        KERNEL.sdiv(self, other)
    }

    #[inline]
    pub fn checked_add(self, other: Self) -> Result<Self, ArithmeticError> {
        KERNEL.checked_add(self, other)
    }

    #[inline]
    pub fn checked_sub(self, other: Self) -> Result<Self, ArithmeticError> {
        KERNEL.checked_sub(self, other)
    }

    #[inline]
    pub fn checked_mul(self, other: Self) -> Result<Self, ArithmeticError> {
        KERNEL.checked_mul(self, other)
    }

    #[inline]
    pub fn checked_div(self, other: Self) -> Result<Self, ArithmeticError> {
        KERNEL.checked_div(self, other)
    }

    #[inline]
    pub fn checked_rem(self, other: Self) -> Result<Self, ArithmeticError> {
        KERNEL.checked_rem(self, other)
    }
}
