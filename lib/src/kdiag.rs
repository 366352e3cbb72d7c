//! Fatal-fault diagnostics.
//!
//! Formats the full machine state captured in a trap frame onto the serial
//! console. The dump path is only reached when kernel invariants are
//! already violated, so it takes no locks and writes straight through the
//! logger.

use vexos_abi::{Eflags, ExceptionKind, TrapFrame};

use crate::cpu;

/// Erase the serial console and home the cursor before a fatal banner.
pub fn kdiag_clear_console() {
    crate::klog::log_raw(format_args!("\x1b[2J\x1b[H"));
}

/// Dump every captured register of a trap frame at error level.
pub fn kdiag_dump_trap_frame(frame: &TrapFrame) {
    let name = match ExceptionKind::from_vector(frame.vector) {
        Some(kind) => kind.name(),
        None => "Unknown Vector",
    };
    let flags = Eflags::from_bits_truncate(frame.eflags);
    crate::klog_error!("EXCEPTION: {} (vector {})", name, frame.vector);
    crate::klog_error!("error code: {:#010x}", frame.error_code);
    crate::klog_error!(
        "eip={:#010x} cs={:#06x} eflags={:#010x} [IF:{}]",
        frame.eip,
        frame.cs,
        frame.eflags,
        flags.contains(Eflags::INTERRUPT_ENABLE) as u32
    );
    crate::klog_error!(
        "eax={:#010x} ebx={:#010x} ecx={:#010x} edx={:#010x}",
        frame.eax,
        frame.ebx,
        frame.ecx,
        frame.edx
    );
    crate::klog_error!(
        "esi={:#010x} edi={:#010x} ebp={:#010x} esp={:#010x}",
        frame.esi,
        frame.edi,
        frame.ebp,
        frame.esp_saved
    );
    crate::klog_error!(
        "ds={:#06x} es={:#06x} fs={:#06x} gs={:#06x}",
        frame.ds,
        frame.es,
        frame.fs,
        frame.gs
    );
    crate::klog_error!(
        "cr0={:#010x} cr2={:#010x} cr3={:#010x} cr4={:#010x}",
        frame.cr0,
        frame.cr2,
        frame.cr3,
        frame.cr4
    );
    if frame.has_user_stack() {
        crate::klog_error!("user esp={:#010x} ss={:#06x}", frame.esp, frame.ss);
    }
}

/// Log a message and halt permanently with interrupts disabled.
pub fn kernel_panic(msg: &str) -> ! {
    cpu::disable_interrupts();
    crate::klog_error!("KERNEL PANIC: {}", msg);
    cpu::halt_loop();
}
