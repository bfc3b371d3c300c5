use std::error::Error;
use std::fmt;

/// Evaluates an `(result, overflow)` pair and reports the overflow through a
/// [`FailureHook`](crate::FailureHook), attributing it to the caller of the
/// enclosing `#[track_caller]` function.
#[macro_export]
macro_rules! fatal_check {
    ($hook:expr, $($c:tt)+) => {
        {
            let (result, overflow) = $($c)+;

            if overflow {
                $crate::FailureHook::failed(
                    $hook,
                    ::core::panic::Location::caller(),
                );
            }

            result
        }
    };
}

#[cfg(not(feature = "no-overflow"))]
pub const CHECKING_OVERFLOW: bool = true;

#[cfg(feature = "no-overflow")]
pub const CHECKING_OVERFLOW: bool = false;

#[cfg(not(feature = "no-rounding"))]
pub const ROUNDING: bool = true;

#[cfg(feature = "no-rounding")]
pub const ROUNDING: bool = false;

/// Behavior switches shared by every strategy of a [`Kernel`](crate::Kernel).
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub struct Options {
    /// Round the discarded bits half away from zero instead of truncating.
    pub rounding: bool,
    /// Detect overflow and return [`Fix16::OVERFLOW`](crate::Fix16::OVERFLOW).
    pub overflow: bool,
}

impl Options {
    /// Options selected by the `no-rounding` and `no-overflow` features.
    pub const DEFAULT: Self = Self {
        rounding: ROUNDING,
        overflow: CHECKING_OVERFLOW,
    };

    /// Rounding and overflow detection both on, whatever the features say.
    pub const STANDARD: Self = Self {
        rounding: true,
        overflow: true,
    };

    pub const fn with_overflow(self) -> Self {
        Self {
            rounding: self.rounding,
            overflow: true,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum ArithmeticError {
    Overflow,
    DivisionByZero,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            ArithmeticError::Overflow => "fixed-point overflow",
            ArithmeticError::DivisionByZero => "division by zero",
        };

        f.write_str(text)
    }
}

impl Error for ArithmeticError {}
