//! Exception disposition policy.

use vexos_abi::signal::SignalKind;
use vexos_abi::trap::{ExceptionKind, TrapFrame};
use vexos_lib::{kdiag_clear_console, kdiag_dump_trap_frame, kernel_panic, klog_error};

/// What the dispatcher should do with a classified exception.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExceptionDisposition {
    /// Kernel-origin fault; the machine state cannot be trusted.
    FatalKernelFault,
    /// User-origin fault; queue a signal for the faulting process.
    RaiseSignal(SignalKind),
}

/// The signal a user-mode exception maps to.
///
/// Only the divide error is distinguishable to userland; every other
/// fault collapses to a segfault.
pub const fn signal_for(kind: ExceptionKind) -> SignalKind {
    match kind {
        ExceptionKind::DivideError => SignalKind::DivZero,
        ExceptionKind::Debug
        | ExceptionKind::NonMaskableInterrupt
        | ExceptionKind::Breakpoint
        | ExceptionKind::Overflow
        | ExceptionKind::BoundRangeExceeded
        | ExceptionKind::InvalidOpcode
        | ExceptionKind::DeviceNotAvailable
        | ExceptionKind::DoubleFault
        | ExceptionKind::CoprocessorSegmentOverrun
        | ExceptionKind::InvalidTss
        | ExceptionKind::SegmentNotPresent
        | ExceptionKind::StackSegmentFault
        | ExceptionKind::GeneralProtectionFault
        | ExceptionKind::PageFault
        | ExceptionKind::Reserved15
        | ExceptionKind::X87FloatingPoint
        | ExceptionKind::AlignmentCheck
        | ExceptionKind::MachineCheck
        | ExceptionKind::SimdFloatingPoint => SignalKind::Segfault,
    }
}

/// Decide how to handle an exception based on where it originated.
pub const fn exception_disposition(kind: ExceptionKind, frame: &TrapFrame) -> ExceptionDisposition {
    if frame.is_user_origin() {
        ExceptionDisposition::RaiseSignal(signal_for(kind))
    } else {
        ExceptionDisposition::FatalKernelFault
    }
}

/// Clear the console, dump the captured machine state, and halt.
pub(crate) fn fatal_kernel_fault(kind: ExceptionKind, frame: &TrapFrame) -> ! {
    kdiag_clear_console();
    klog_error!(
        "EXCEPTION: {} (vector {}) in kernel context",
        kind.name(),
        frame.vector
    );
    kdiag_dump_trap_frame(frame);
    kernel_panic("unrecoverable kernel fault");
}
