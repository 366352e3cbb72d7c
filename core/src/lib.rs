#![no_std]

pub mod syscall;
pub mod trap;

pub use syscall::{SyscallHandlerFn, SyscallRequest, SyscallTable};
pub use trap::{
    handle_trap, trap_core, trap_core_install, InterruptController, ProcessProvider, SignalOutbox,
    TrapCore,
};
