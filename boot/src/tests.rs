//! Vector table validation tests.
//!
//! These pin the gate-population rules: the plan enumerates exactly the
//! exception, IRQ, and syscall vectors, every unplanned slot falls through
//! to the shared unknown gate, and only the syscall gate opens to ring 3.

use core::ffi::c_int;

use vexos_abi::trap::{
    EXCEPTION_COUNT, IDT_ENTRIES, IRQ_BASE_VECTOR, IRQ_LINE_COUNT, KERNEL_CS, SYSCALL_VECTOR,
};
use vexos_lib::klog_info;

use crate::idt::{GateAttributes, Idt, VectorClass, VectorPlan, VECTOR_PLAN, VECTOR_PLAN_LEN};

const UNKNOWN_ADDR: u32 = 0x000F_FFF0;

fn synthetic_address(plan: &VectorPlan) -> u32 {
    0x0010_0000 + plan.vector as u32 * 0x10
}

fn built_table() -> Idt {
    Idt::build(synthetic_address, UNKNOWN_ADDR)
}

fn planned(vector: u8) -> Option<&'static VectorPlan> {
    VECTOR_PLAN.iter().find(|plan| plan.vector == vector)
}

// =============================================================================
// VECTOR PLAN TESTS
// =============================================================================

/// Test: the plan lists exceptions, IRQs, and the syscall gate exactly once
pub fn test_plan_covers_expected_vectors() -> c_int {
    if VECTOR_PLAN.len() != VECTOR_PLAN_LEN {
        klog_info!("VECTOR_TEST: BUG - plan length mismatch!");
        return -1;
    }

    for vector in 0..EXCEPTION_COUNT {
        match planned(vector) {
            Some(plan) if plan.class == VectorClass::Exception => {}
            _ => {
                klog_info!("VECTOR_TEST: BUG - exception vector {} missing from plan!", vector);
                return -1;
            }
        }
    }
    for line in 0..IRQ_LINE_COUNT as u8 {
        match planned(IRQ_BASE_VECTOR + line) {
            Some(plan) if plan.class == VectorClass::Irq => {}
            _ => {
                klog_info!("VECTOR_TEST: BUG - IRQ line {} missing from plan!", line);
                return -1;
            }
        }
    }
    match planned(SYSCALL_VECTOR) {
        Some(plan) if plan.class == VectorClass::Syscall => {}
        _ => {
            klog_info!("VECTOR_TEST: BUG - syscall vector missing from plan!");
            return -1;
        }
    }

    for (i, a) in VECTOR_PLAN.iter().enumerate() {
        for b in VECTOR_PLAN.iter().skip(i + 1) {
            if a.vector == b.vector {
                klog_info!("VECTOR_TEST: BUG - vector {} planned twice!", a.vector);
                return -1;
            }
        }
    }
    0
}

/// Test: exactly the architectural error-code exceptions are flagged
pub fn test_plan_error_code_vectors() -> c_int {
    for plan in VECTOR_PLAN.iter() {
        let expected = matches!(plan.vector, 8 | 10 | 11 | 12 | 13 | 14 | 17);
        if plan.has_error_code != expected {
            klog_info!(
                "VECTOR_TEST: BUG - vector {} error-code flag is wrong!",
                plan.vector
            );
            return -1;
        }
    }
    0
}

// =============================================================================
// TABLE BUILD TESTS
// =============================================================================

/// Test: every one of the 256 slots is a present kernel interrupt gate
pub fn test_build_fills_every_slot() -> c_int {
    let idt = built_table();
    for vector in 0..IDT_ENTRIES {
        let entry = idt.entry(vector as u8);
        if !entry.is_present() {
            klog_info!("VECTOR_TEST: BUG - vector {} gate not present!", vector);
            return -1;
        }
        if entry.selector() != KERNEL_CS as u16 {
            klog_info!("VECTOR_TEST: BUG - vector {} selector is not kernel code!", vector);
            return -1;
        }
        if !entry.attributes().contains(GateAttributes::INTERRUPT_GATE) {
            klog_info!("VECTOR_TEST: BUG - vector {} is not an interrupt gate!", vector);
            return -1;
        }
    }
    0
}

/// Test: planned vectors route to their trampoline, the rest to unknown
pub fn test_build_routes_planned_vectors() -> c_int {
    let idt = built_table();
    for vector in 0..IDT_ENTRIES {
        let entry = idt.entry(vector as u8);
        match planned(vector as u8) {
            Some(plan) => {
                if entry.handler() != synthetic_address(plan) {
                    klog_info!("VECTOR_TEST: BUG - vector {} routed to the wrong stub!", vector);
                    return -1;
                }
            }
            None => {
                if entry.handler() != UNKNOWN_ADDR {
                    klog_info!(
                        "VECTOR_TEST: BUG - unplanned vector {} missed the unknown stub!",
                        vector
                    );
                    return -1;
                }
            }
        }
    }
    0
}

/// Test: the syscall gate is the only DPL 3 gate in the table
pub fn test_build_syscall_gate_dpl() -> c_int {
    let idt = built_table();
    for vector in 0..IDT_ENTRIES {
        let entry = idt.entry(vector as u8);
        let expected = if vector as u8 == SYSCALL_VECTOR { 3 } else { 0 };
        if entry.dpl() != expected {
            klog_info!("VECTOR_TEST: BUG - vector {} has DPL {}!", vector, entry.dpl());
            return -1;
        }
    }
    0
}

/// Test: a full 32-bit handler address survives the offset split
pub fn test_gate_encodes_full_offset() -> c_int {
    let idt = Idt::build(|_| 0xDEAD_BEEF, 0xCAFE_F00D);
    if idt.entry(SYSCALL_VECTOR).handler() != 0xDEAD_BEEF {
        klog_info!("VECTOR_TEST: BUG - planned gate lost offset bits!");
        return -1;
    }
    if idt.entry(0xF0).handler() != 0xCAFE_F00D {
        klog_info!("VECTOR_TEST: BUG - unknown gate lost offset bits!");
        return -1;
    }
    0
}
