//! Signal kinds shared between the kernel and userland.

/// Signal numbers deliverable to a user process.
///
/// The exception classifier produces only `DivZero` and `Segfault`; the
/// remaining kinds are raised by device handlers and userland itself.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    /// Divide error in user code.
    DivZero = 0,
    /// Any other user-mode fault.
    Segfault = 1,
    /// Keyboard interrupt request.
    Interrupt = 2,
    /// Periodic alarm.
    Alarm = 3,
    /// User-defined signal.
    User1 = 4,
}

impl SignalKind {
    /// Convert from a raw signal number.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::DivZero),
            1 => Some(Self::Segfault),
            2 => Some(Self::Interrupt),
            3 => Some(Self::Alarm),
            4 => Some(Self::User1),
            _ => None,
        }
    }

    /// Raw signal number for the userland ABI.
    #[inline]
    pub const fn as_raw(self) -> u32 {
        self as u32
    }
}
