//! Trap dispatch core.
//!
//! Every trampoline funnels into [`handle_trap`] with a uniform
//! [`TrapFrame`]. The installed [`TrapCore`] classifies the vector and
//! routes it to the exception, IRQ, or syscall path, then runs signal
//! delivery for traps returning to ring 3.
//!
//! The core owns no hardware: the interrupt controller, signal queue, and
//! process identity sit behind traits so boot code wires real drivers in
//! while validation suites substitute recording fakes.

pub mod dispatch;
pub mod exceptions;
pub mod irq;

pub use dispatch::{classify, TrapClass};
pub use exceptions::{exception_disposition, signal_for, ExceptionDisposition};
pub use irq::{IrqHandlerFn, IrqRegistry};

use spin::Once;

use vexos_abi::error::IrqError;
use vexos_abi::signal::SignalKind;
use vexos_abi::trap::TrapFrame;
use vexos_lib::klog_error;

use crate::syscall::SyscallTable;

/// Hardware interrupt controller operations the dispatcher depends on.
pub trait InterruptController: Sync {
    /// Acknowledge a serviced line so the controller can raise it again.
    fn end_of_interrupt(&self, line: u8);
    /// Suppress delivery of a line.
    fn mask_line(&self, line: u8);
    /// Allow delivery of a line.
    fn unmask_line(&self, line: u8);
}

/// Sink for signals raised against user processes.
pub trait SignalOutbox: Sync {
    /// Queue `kind` for process `pid`.
    fn raise(&self, pid: u32, kind: SignalKind);
    /// Deliver queued signals by rewriting the outgoing user frame.
    fn deliver_pending(&self, frame: &mut TrapFrame);
}

/// Source of the identity of the process running when a trap arrived.
pub trait ProcessProvider: Sync {
    fn current_pid(&self) -> u32;
}

/// The assembled dispatch core: registries plus the wired-in hooks.
pub struct TrapCore {
    irq: IrqRegistry,
    syscalls: SyscallTable,
    controller: &'static dyn InterruptController,
    signals: &'static dyn SignalOutbox,
    processes: &'static dyn ProcessProvider,
}

impl TrapCore {
    pub const fn new(
        syscalls: SyscallTable,
        controller: &'static dyn InterruptController,
        signals: &'static dyn SignalOutbox,
        processes: &'static dyn ProcessProvider,
    ) -> Self {
        Self {
            irq: IrqRegistry::new(),
            syscalls,
            controller,
            signals,
            processes,
        }
    }

    /// Install `handler` on an IRQ line and unmask it at the controller.
    ///
    /// Replaces any existing handler on the line.
    pub fn register_irq_handler(&self, line: u8, handler: IrqHandlerFn) -> Result<(), IrqError> {
        self.irq.register(line, handler)?;
        self.controller.unmask_line(line);
        Ok(())
    }

    /// Remove the handler on an IRQ line and mask it at the controller.
    ///
    /// Unregistering a line with no handler is a no-op apart from masking.
    pub fn unregister_irq_handler(&self, line: u8) -> Result<(), IrqError> {
        self.irq.unregister(line)?;
        self.controller.mask_line(line);
        Ok(())
    }

    /// Interrupts observed on `line` since boot.
    pub fn irq_count(&self, line: u8) -> u64 {
        self.irq.count(line)
    }

    pub(crate) fn irq(&self) -> &IrqRegistry {
        &self.irq
    }

    pub(crate) fn syscalls(&self) -> &SyscallTable {
        &self.syscalls
    }

    pub(crate) fn controller(&self) -> &dyn InterruptController {
        self.controller
    }

    pub(crate) fn signals(&self) -> &dyn SignalOutbox {
        self.signals
    }

    pub(crate) fn processes(&self) -> &dyn ProcessProvider {
        self.processes
    }
}

static TRAP_CORE: Once<TrapCore> = Once::new();

/// Install the kernel's trap core. The first call wins; later calls get
/// the already-installed instance back.
pub fn trap_core_install(core: TrapCore) -> &'static TrapCore {
    TRAP_CORE.call_once(|| core)
}

/// The installed trap core, if boot wiring has run.
pub fn trap_core() -> Option<&'static TrapCore> {
    TRAP_CORE.get()
}

/// Entry point called from the trampoline boundary.
///
/// Traps that arrive before the core is installed are logged and dropped;
/// there is nothing to dispatch them to yet.
pub fn handle_trap(frame: &mut TrapFrame) {
    match TRAP_CORE.get() {
        Some(core) => dispatch::dispatch_trap(core, frame),
        None => {
            klog_error!(
                "TRAP: vector {:#x} before trap core install, dropping",
                frame.vector
            );
        }
    }
}
