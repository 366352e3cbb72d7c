//! Error types for kernel-userland communication

use core::ffi::c_int;

/// Implement common methods for kernel error enums.
///
/// Generates `as_c_int()`, `from_c_int()`, `is_success()`, and `is_error()` methods
/// for `#[repr(i32)]` error enums that follow the kernel's error convention.
macro_rules! impl_kernel_error {
    ($ty:ty, fallback: $fallback:ident, variants: { $($val:literal => $variant:ident),* $(,)? }) => {
        impl $ty {
            /// Convert to C-style integer for syscall returns.
            #[inline]
            pub fn as_c_int(self) -> c_int {
                self as c_int
            }

            /// Convert from C-style integer.
            #[inline]
            pub fn from_c_int(val: c_int) -> Self {
                match val {
                    $($val => Self::$variant,)*
                    _ => Self::$fallback,
                }
            }

            /// Check if this is a success result.
            #[inline]
            pub fn is_success(self) -> bool {
                matches!(self, Self::Success)
            }

            /// Check if this is an error result.
            #[inline]
            pub fn is_error(self) -> bool {
                !self.is_success()
            }
        }
    };
}

/// Errors returned by system call handlers.
///
/// The single `-1` failure value is part of the userland ABI: an invalid
/// syscall number and a failing handler are indistinguishable to the
/// caller, matching the gate's sentinel contract.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyscallError {
    /// Operation succeeded
    #[default]
    Success = 0,
    /// Invalid number, bad argument, or handler failure
    Failure = -1,
}

impl_kernel_error!(SyscallError, fallback: Failure, variants: {
    0 => Success,
    -1 => Failure,
});

/// Errors returned by the IRQ registry.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IrqError {
    /// Operation succeeded
    #[default]
    Success = 0,
    /// Line number outside the cascaded controller's range
    InvalidLine = -1,
}

impl_kernel_error!(IrqError, fallback: InvalidLine, variants: {
    0 => Success,
    -1 => InvalidLine,
});
