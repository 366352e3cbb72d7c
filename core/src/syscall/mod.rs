//! System call table and typed request plumbing.
//!
//! Gate ABI: userland loads the call number into EAX and up to three
//! arguments into EBX, ECX, and EDX, then executes `int 0x80`. The result
//! travels back in EAX, with -1 covering both unknown numbers and handler
//! failures.

pub mod tests;

use vexos_abi::syscall::{SYSCALL_COUNT, SYSCALL_FAILURE};
use vexos_abi::trap::TrapFrame;

/// A decoded system call, handed to table entries by value.
pub struct SyscallRequest<'a> {
    pub number: u32,
    pub args: [u32; 3],
    pub frame: &'a mut TrapFrame,
}

impl<'a> SyscallRequest<'a> {
    /// Decode the register-passed call from a trap frame.
    pub fn from_frame(frame: &'a mut TrapFrame) -> Self {
        let number = frame.eax;
        let args = [frame.ebx, frame.ecx, frame.edx];
        Self {
            number,
            args,
            frame,
        }
    }

    #[inline]
    pub fn arg0(&self) -> u32 {
        self.args[0]
    }

    #[inline]
    pub fn arg1(&self) -> u32 {
        self.args[1]
    }

    #[inline]
    pub fn arg2(&self) -> u32 {
        self.args[2]
    }
}

/// Handler signature for table entries.
pub type SyscallHandlerFn = fn(SyscallRequest<'_>) -> i32;

/// Fixed-size dispatch table indexed by call number minus one.
pub struct SyscallTable {
    entries: [SyscallHandlerFn; SYSCALL_COUNT],
}

impl SyscallTable {
    pub const fn new(entries: [SyscallHandlerFn; SYSCALL_COUNT]) -> Self {
        Self { entries }
    }

    /// Route a request to its handler.
    ///
    /// Number zero wraps to `usize::MAX` under the subtract, so it falls
    /// out of the bound check together with everything past the table end.
    /// Neither case touches an entry.
    pub fn dispatch(&self, request: SyscallRequest<'_>) -> i32 {
        let index = request.number.wrapping_sub(1) as usize;
        match self.entries.get(index) {
            Some(handler) => handler(request),
            None => SYSCALL_FAILURE,
        }
    }

    /// Look up the handler a call number would route to.
    pub fn handler_for(&self, number: u32) -> Option<SyscallHandlerFn> {
        let index = number.wrapping_sub(1) as usize;
        self.entries.get(index).copied()
    }
}
