//! Reporting for the extended-precision helpers.
//!
//! The `a*` helpers on [`Kernel`](crate::Kernel) call
//! [`FailureHook::failed`] with the caller's source location whenever they
//! overflow or divide by zero, then return
//! [`Fix16::OVERFLOW`](crate::Fix16::OVERFLOW).
//! The plain kernel operations never call it.

use std::panic::Location;

pub trait FailureHook {
    fn failed(&self, location: &'static Location<'static>);
}

impl<H: FailureHook + ?Sized> FailureHook for &H {
    #[inline]
    fn failed(&self, location: &'static Location<'static>) {
        (**self).failed(location)
    }
}

/// Reports through `log::error!`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogHook;

impl FailureHook for LogHook {
    fn failed(&self, location: &'static Location<'static>) {
        log::error!(
            "fixed-point overflow at {}:{}",
            location.file(),
            location.line()
        );
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NoopHook;

impl FailureHook for NoopHook {
    #[inline]
    fn failed(&self, _location: &'static Location<'static>) {}
}

/// Turns every failure into a panic at the caller.
#[derive(Copy, Clone, Debug, Default)]
pub struct PanicHook;

impl FailureHook for PanicHook {
    fn failed(&self, location: &'static Location<'static>) {
        panic!("fixed-point overflow at {location}");
    }
}

#[derive(Copy, Clone, Debug)]
pub struct FnHook(pub fn(&'static Location<'static>));

impl FailureHook for FnHook {
    #[inline]
    fn failed(&self, location: &'static Location<'static>) {
        (self.0)(location)
    }
}
