//! Q16.16 fixed-point arithmetic for targets without (or avoiding) an FPU.
//!
//! [`Fix16`] is a 32-bit signed value with 16 fractional bits. Multiplication
//! and division come in interchangeable strategies ([`NativeWide`],
//! [`Split16`], [`Split8`] and [`HardwareDivide`], [`RestoringDivide`]) that
//! produce identical results; a [`Kernel`] picks one of each. [`KERNEL`] is
//! the build-time default selected through Cargo features, and the
//! `std::ops` operators on [`Fix16`] go through it.
//!
//! Overflow is reported by returning [`Fix16::OVERFLOW`], which is the same
//! bit pattern as [`Fix16::MINIMUM`]. Callers that need to tell them apart use
//! the `overflowing_*` or `checked_*` variants.

#[macro_use]
mod unroll;

mod addsub;
mod bits;
mod div;
mod ext;
mod format;
pub mod hook;
mod kernel;
mod lerp;
mod misc;
mod mul;
pub mod overflow;
mod parse;
mod sqrt;

pub use div::{DivStrategy, HardwareDivide, RestoringDivide};
pub use hook::{FailureHook, FnHook, LogHook, NoopHook, PanicHook};
pub use kernel::{DefaultDiv, DefaultKernel, DefaultMul, Kernel, KERNEL};
pub use mul::{MulStrategy, NativeWide, Split16, Split8};
pub use overflow::{ArithmeticError, Options};
pub use parse::FromStrErr;

/// Q16.16 fixed-point number: `raw / 65536`.
#[derive(Eq, PartialEq, Hash, Copy, Clone, Default, PartialOrd, Ord)]
pub struct Fix16(pub i32);

/// Software 64-bit signed integer, `hi * 2^32 + lo`.
///
/// Every operation is built from 32-bit arithmetic and wraps exactly like
/// `i64` would.
#[derive(Eq, PartialEq, Hash, Copy, Clone, Default)]
pub struct Wide {
    pub hi: i32,
    pub lo: u32,
}

#[cfg(test)]
use quickcheck::Arbitrary;

#[cfg(test)]
impl Arbitrary for Fix16 {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self(i32::arbitrary(g))
    }
}

#[cfg(test)]
impl Arbitrary for Wide {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self {
            hi: i32::arbitrary(g),
            lo: u32::arbitrary(g),
        }
    }
}

#[cfg(test)]
impl Wide {
    pub(crate) fn from_i64(n: i64) -> Self {
        Self {
            hi: (n >> 32) as i32,
            lo: n as u32,
        }
    }

    pub(crate) fn to_i64(self) -> i64 {
        ((self.hi as i64) << 32) | self.lo as i64
    }
}

#[cfg(test)]
pub fn rng() -> rand_pcg::Pcg64 {
    let now = std::time::Instant::now();
    let seed = now.elapsed().as_nanos();

    rand_pcg::Pcg64::new(0xcafef00dd15ea5e5 ^ seed, 0xa02bdbf7bb3c0a7ac28fa16a64abf96)
}
