//! Trampoline symbols and the C-ABI entry they funnel into.
//!
//! The assembly stubs normalize every trap to the uniform frame layout
//! before handing a single frame pointer to [`trap_entry`]. This module
//! maps vector-plan records onto the stub addresses the table builder
//! installs.

use core::arch::global_asm;

use vexos_abi::trap::{TrapFrame, IRQ_BASE_VECTOR};
use vexos_core::trap::handle_trap;

use crate::idt::{VectorClass, VectorPlan};

global_asm!(include_str!("../idt_stubs.s"));

unsafe extern "C" {
    fn trap_stub_exc_0();
    fn trap_stub_exc_1();
    fn trap_stub_exc_2();
    fn trap_stub_exc_3();
    fn trap_stub_exc_4();
    fn trap_stub_exc_5();
    fn trap_stub_exc_6();
    fn trap_stub_exc_7();
    fn trap_stub_exc_8();
    fn trap_stub_exc_9();
    fn trap_stub_exc_10();
    fn trap_stub_exc_11();
    fn trap_stub_exc_12();
    fn trap_stub_exc_13();
    fn trap_stub_exc_14();
    fn trap_stub_exc_15();
    fn trap_stub_exc_16();
    fn trap_stub_exc_17();
    fn trap_stub_exc_18();
    fn trap_stub_exc_19();
    fn trap_stub_irq_0();
    fn trap_stub_irq_1();
    fn trap_stub_irq_2();
    fn trap_stub_irq_3();
    fn trap_stub_irq_4();
    fn trap_stub_irq_5();
    fn trap_stub_irq_6();
    fn trap_stub_irq_7();
    fn trap_stub_irq_8();
    fn trap_stub_irq_9();
    fn trap_stub_irq_10();
    fn trap_stub_irq_11();
    fn trap_stub_irq_12();
    fn trap_stub_irq_13();
    fn trap_stub_irq_14();
    fn trap_stub_irq_15();
    fn trap_stub_syscall();
    fn trap_stub_unknown();
}

/// Dispatch target shared by every trampoline.
#[unsafe(no_mangle)]
extern "C" fn trap_entry(frame: *mut TrapFrame) {
    let Some(frame) = (unsafe { frame.as_mut() }) else {
        return;
    };
    handle_trap(frame);
}

/// Trampoline address for a planned vector.
pub fn stub_address(plan: &VectorPlan) -> u32 {
    let stub: unsafe extern "C" fn() = match plan.class {
        VectorClass::Exception => exception_stub(plan.vector),
        VectorClass::Irq => irq_stub(plan.vector.wrapping_sub(IRQ_BASE_VECTOR)),
        VectorClass::Syscall => trap_stub_syscall,
    };
    stub as usize as u32
}

/// Shared trampoline for vectors outside the plan.
pub fn unknown_stub_address() -> u32 {
    trap_stub_unknown as usize as u32
}

fn exception_stub(vector: u8) -> unsafe extern "C" fn() {
    match vector {
        0 => trap_stub_exc_0,
        1 => trap_stub_exc_1,
        2 => trap_stub_exc_2,
        3 => trap_stub_exc_3,
        4 => trap_stub_exc_4,
        5 => trap_stub_exc_5,
        6 => trap_stub_exc_6,
        7 => trap_stub_exc_7,
        8 => trap_stub_exc_8,
        9 => trap_stub_exc_9,
        10 => trap_stub_exc_10,
        11 => trap_stub_exc_11,
        12 => trap_stub_exc_12,
        13 => trap_stub_exc_13,
        14 => trap_stub_exc_14,
        15 => trap_stub_exc_15,
        16 => trap_stub_exc_16,
        17 => trap_stub_exc_17,
        18 => trap_stub_exc_18,
        19 => trap_stub_exc_19,
        _ => trap_stub_unknown,
    }
}

fn irq_stub(line: u8) -> unsafe extern "C" fn() {
    match line {
        0 => trap_stub_irq_0,
        1 => trap_stub_irq_1,
        2 => trap_stub_irq_2,
        3 => trap_stub_irq_3,
        4 => trap_stub_irq_4,
        5 => trap_stub_irq_5,
        6 => trap_stub_irq_6,
        7 => trap_stub_irq_7,
        8 => trap_stub_irq_8,
        9 => trap_stub_irq_9,
        10 => trap_stub_irq_10,
        11 => trap_stub_irq_11,
        12 => trap_stub_irq_12,
        13 => trap_stub_irq_13,
        14 => trap_stub_irq_14,
        15 => trap_stub_irq_15,
        _ => trap_stub_unknown,
    }
}
