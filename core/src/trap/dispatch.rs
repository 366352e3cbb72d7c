//! Vector classification and the per-class dispatch paths.

use vexos_abi::trap::{ExceptionKind, TrapFrame, IRQ_BASE_VECTOR, IRQ_LINE_COUNT, SYSCALL_VECTOR};
use vexos_lib::{klog_debug, klog_info, klog_warn};

use crate::syscall::SyscallRequest;
use crate::trap::exceptions::{self, ExceptionDisposition};
use crate::trap::TrapCore;

/// What a raw vector number means to the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapClass {
    /// CPU-defined exception, vectors 0 through 19.
    Exception(ExceptionKind),
    /// Hardware interrupt, carrying the controller line number.
    Irq(u8),
    /// The `int 0x80` gate.
    Syscall,
    /// Anything outside the three handled ranges.
    Unknown,
}

/// Classify a vector number into its dispatch path.
pub const fn classify(vector: u32) -> TrapClass {
    if let Some(kind) = ExceptionKind::from_vector(vector) {
        return TrapClass::Exception(kind);
    }
    let irq_base = IRQ_BASE_VECTOR as u32;
    let irq_end = irq_base + IRQ_LINE_COUNT as u32;
    if vector >= irq_base && vector < irq_end {
        return TrapClass::Irq((vector - irq_base) as u8);
    }
    if vector == SYSCALL_VECTOR as u32 {
        return TrapClass::Syscall;
    }
    TrapClass::Unknown
}

/// Route one trap through its class handler, then run signal delivery if
/// the frame returns to ring 3.
pub(crate) fn dispatch_trap(core: &TrapCore, frame: &mut TrapFrame) {
    match classify(frame.vector) {
        TrapClass::Exception(kind) => handle_exception(core, kind, frame),
        TrapClass::Irq(line) => handle_irq(core, line),
        TrapClass::Syscall => handle_syscall(core, frame),
        TrapClass::Unknown => {
            klog_warn!("TRAP: ignoring unexpected vector {:#x}", frame.vector);
        }
    }

    // Signals reach userland only on the transition back to ring 3.
    if frame.is_user_origin() {
        core.signals().deliver_pending(frame);
    }
}

fn handle_exception(core: &TrapCore, kind: ExceptionKind, frame: &mut TrapFrame) {
    match exceptions::exception_disposition(kind, frame) {
        ExceptionDisposition::FatalKernelFault => exceptions::fatal_kernel_fault(kind, frame),
        ExceptionDisposition::RaiseSignal(signal) => {
            let pid = core.processes().current_pid();
            klog_info!(
                "EXCEPTION: {} at eip={:#010x} in pid {}, raising signal",
                kind.name(),
                frame.eip,
                pid
            );
            core.signals().raise(pid, signal);
        }
    }
}

fn handle_irq(core: &TrapCore, line: u8) {
    let handler = core.irq().note_interrupt(line);
    if let Some(handler) = handler {
        handler();
    } else {
        klog_debug!("IRQ: line {} fired with no registered handler", line);
    }
    // The callback runs first; the acknowledgement is sent unconditionally,
    // including for lines nobody registered.
    core.controller().end_of_interrupt(line);
}

fn handle_syscall(core: &TrapCore, frame: &mut TrapFrame) {
    let request = SyscallRequest::from_frame(frame);
    let result = core.syscalls().dispatch(request);
    frame.eax = result as u32;
}
