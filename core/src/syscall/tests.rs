//! Syscall table validation tests.
//!
//! These target the number-to-slot routing rules: number zero and
//! out-of-range numbers must fail without touching a table entry, and
//! valid numbers must land on the slot one below their number.

use core::ffi::c_int;
use core::sync::atomic::{AtomicI32, AtomicU32, Ordering};

use vexos_abi::syscall::{
    SYSCALL_COUNT, SYSCALL_FAILURE, SYSCALL_HALT, SYSCALL_SIGRETURN, SYSCALL_WRITE,
};
use vexos_abi::trap::TrapFrame;
use vexos_lib::klog_info;

use crate::syscall::{SyscallRequest, SyscallTable};

// =============================================================================
// RECORDING TABLE
// =============================================================================

static HIT_SLOT: AtomicI32 = AtomicI32::new(-1);
static HIT_COUNT: AtomicU32 = AtomicU32::new(0);
static HIT_ARG0: AtomicU32 = AtomicU32::new(0);
static HIT_ARG1: AtomicU32 = AtomicU32::new(0);
static HIT_ARG2: AtomicU32 = AtomicU32::new(0);

fn record(slot: i32, request: &SyscallRequest<'_>) -> i32 {
    HIT_SLOT.store(slot, Ordering::Relaxed);
    HIT_COUNT.fetch_add(1, Ordering::Relaxed);
    HIT_ARG0.store(request.arg0(), Ordering::Relaxed);
    HIT_ARG1.store(request.arg1(), Ordering::Relaxed);
    HIT_ARG2.store(request.arg2(), Ordering::Relaxed);
    100 + slot
}

fn slot0(request: SyscallRequest<'_>) -> i32 {
    record(0, &request)
}
fn slot1(request: SyscallRequest<'_>) -> i32 {
    record(1, &request)
}
fn slot2(request: SyscallRequest<'_>) -> i32 {
    record(2, &request)
}
fn slot3(request: SyscallRequest<'_>) -> i32 {
    record(3, &request)
}
fn slot4(request: SyscallRequest<'_>) -> i32 {
    record(4, &request)
}
fn slot5(request: SyscallRequest<'_>) -> i32 {
    record(5, &request)
}
fn slot6(request: SyscallRequest<'_>) -> i32 {
    record(6, &request)
}
fn slot7(request: SyscallRequest<'_>) -> i32 {
    record(7, &request)
}
fn slot8(request: SyscallRequest<'_>) -> i32 {
    record(8, &request)
}
fn slot9(request: SyscallRequest<'_>) -> i32 {
    record(9, &request)
}

fn recording_table() -> SyscallTable {
    SyscallTable::new([
        slot0, slot1, slot2, slot3, slot4, slot5, slot6, slot7, slot8, slot9,
    ])
}

fn reset_recording() {
    HIT_SLOT.store(-1, Ordering::Relaxed);
    HIT_COUNT.store(0, Ordering::Relaxed);
    HIT_ARG0.store(0, Ordering::Relaxed);
    HIT_ARG1.store(0, Ordering::Relaxed);
    HIT_ARG2.store(0, Ordering::Relaxed);
}

fn request_frame(number: u32, args: [u32; 3]) -> TrapFrame {
    let mut frame = TrapFrame::empty();
    frame.eax = number;
    frame.ebx = args[0];
    frame.ecx = args[1];
    frame.edx = args[2];
    frame
}

// =============================================================================
// DISPATCH TESTS
// =============================================================================

/// Test: number zero is rejected without invoking any entry
pub fn test_dispatch_rejects_number_zero() -> c_int {
    reset_recording();
    let table = recording_table();

    let mut frame = request_frame(0, [0; 3]);
    let result = table.dispatch(SyscallRequest::from_frame(&mut frame));

    if result != SYSCALL_FAILURE {
        klog_info!("SYSCALL_TEST: BUG - number 0 did not return the failure sentinel!");
        return -1;
    }
    if HIT_COUNT.load(Ordering::Relaxed) != 0 {
        klog_info!("SYSCALL_TEST: BUG - number 0 invoked a table entry!");
        return -1;
    }
    0
}

/// Test: numbers past the table end are rejected without invoking entries
pub fn test_dispatch_rejects_out_of_range() -> c_int {
    reset_recording();
    let table = recording_table();

    for number in [SYSCALL_COUNT as u32 + 1, 0x80, 0xFFFF, u32::MAX] {
        let mut frame = request_frame(number, [0; 3]);
        let result = table.dispatch(SyscallRequest::from_frame(&mut frame));
        if result != SYSCALL_FAILURE {
            klog_info!("SYSCALL_TEST: BUG - number {} did not fail!", number);
            return -1;
        }
    }
    if HIT_COUNT.load(Ordering::Relaxed) != 0 {
        klog_info!("SYSCALL_TEST: BUG - out-of-range number invoked a table entry!");
        return -1;
    }
    0
}

/// Test: the first and last valid numbers land on the boundary slots
pub fn test_dispatch_routes_first_and_last() -> c_int {
    reset_recording();
    let table = recording_table();

    let mut frame = request_frame(SYSCALL_HALT, [0; 3]);
    let result = table.dispatch(SyscallRequest::from_frame(&mut frame));
    if result != 100 || HIT_SLOT.load(Ordering::Relaxed) != 0 {
        klog_info!("SYSCALL_TEST: BUG - number 1 did not route to slot 0!");
        return -1;
    }

    let mut frame = request_frame(SYSCALL_SIGRETURN, [0; 3]);
    let result = table.dispatch(SyscallRequest::from_frame(&mut frame));
    if result != 109 || HIT_SLOT.load(Ordering::Relaxed) != 9 {
        klog_info!("SYSCALL_TEST: BUG - number 10 did not route to slot 9!");
        return -1;
    }
    0
}

/// Test: every valid number routes to the slot one below it
pub fn test_dispatch_every_valid_number() -> c_int {
    reset_recording();
    let table = recording_table();

    for number in 1..=SYSCALL_COUNT as u32 {
        let mut frame = request_frame(number, [0; 3]);
        let result = table.dispatch(SyscallRequest::from_frame(&mut frame));
        let expected_slot = (number - 1) as i32;
        if result != 100 + expected_slot || HIT_SLOT.load(Ordering::Relaxed) != expected_slot {
            klog_info!("SYSCALL_TEST: BUG - number {} routed to the wrong slot!", number);
            return -1;
        }
    }
    if HIT_COUNT.load(Ordering::Relaxed) != SYSCALL_COUNT as u32 {
        klog_info!("SYSCALL_TEST: BUG - unexpected number of entry invocations!");
        return -1;
    }
    0
}

/// Test: EBX, ECX, and EDX reach the handler in argument order
pub fn test_dispatch_passes_register_args() -> c_int {
    reset_recording();
    let table = recording_table();

    let mut frame = request_frame(SYSCALL_WRITE, [1, 0x0804_B000, 32]);
    let _ = table.dispatch(SyscallRequest::from_frame(&mut frame));

    if HIT_ARG0.load(Ordering::Relaxed) != 1
        || HIT_ARG1.load(Ordering::Relaxed) != 0x0804_B000
        || HIT_ARG2.load(Ordering::Relaxed) != 32
    {
        klog_info!("SYSCALL_TEST: BUG - register arguments arrived out of order!");
        return -1;
    }
    0
}

// =============================================================================
// LOOKUP TESTS
// =============================================================================

/// Test: handler lookup obeys the same bounds as dispatch
pub fn test_handler_lookup_bounds() -> c_int {
    let table = recording_table();

    if table.handler_for(0).is_some() {
        klog_info!("SYSCALL_TEST: BUG - lookup returned a handler for number 0!");
        return -1;
    }
    if table.handler_for(SYSCALL_COUNT as u32 + 1).is_some() {
        klog_info!("SYSCALL_TEST: BUG - lookup returned a handler past the table end!");
        return -1;
    }
    if table.handler_for(u32::MAX).is_some() {
        klog_info!("SYSCALL_TEST: BUG - lookup returned a handler for u32::MAX!");
        return -1;
    }
    if table.handler_for(SYSCALL_HALT).is_none() {
        klog_info!("SYSCALL_TEST: BUG - lookup missed the first valid number!");
        return -1;
    }
    0
}

/// Test: request decoding pulls number and arguments from the right registers
pub fn test_request_decodes_frame() -> c_int {
    let mut frame = request_frame(SYSCALL_WRITE, [0xAA, 0xBB, 0xCC]);
    let request = SyscallRequest::from_frame(&mut frame);

    if request.number != SYSCALL_WRITE {
        klog_info!("SYSCALL_TEST: BUG - request number not taken from eax!");
        return -1;
    }
    if request.arg0() != 0xAA || request.arg1() != 0xBB || request.arg2() != 0xCC {
        klog_info!("SYSCALL_TEST: BUG - request arguments not taken from ebx/ecx/edx!");
        return -1;
    }
    0
}
