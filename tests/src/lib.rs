//! Builtin test suite registry and runner.
//!
//! Validation suites live beside the code they exercise; this crate only
//! aggregates their descriptors and drives the run. The kernel binary
//! invokes it when compiled with the builtin-tests feature.

#![no_std]

use vexos_lib::klog_info;
use vexos_lib::register_test_suites;
use vexos_lib::testing::{
    measure_elapsed_ms, TestRunSummary, TestSuiteDesc, TestSuiteResult, HARNESS_MAX_SUITES,
};
use vexos_lib::tsc;

static mut REGISTRY: [Option<&'static TestSuiteDesc>; HARNESS_MAX_SUITES] =
    [None; HARNESS_MAX_SUITES];
static mut REGISTRY_COUNT: usize = 0;

fn registry_mut() -> *mut [Option<&'static TestSuiteDesc>; HARNESS_MAX_SUITES] {
    &raw mut REGISTRY
}

fn registry_count_mut() -> *mut usize {
    &raw mut REGISTRY_COUNT
}

pub fn tests_reset_registry() {
    unsafe {
        (*registry_mut()).iter_mut().for_each(|slot| *slot = None);
        *registry_count_mut() = 0;
    }
}

pub fn tests_register_suite(desc: &'static TestSuiteDesc) -> i32 {
    if desc.run.is_none() {
        return -1;
    }
    unsafe {
        if *registry_count_mut() >= HARNESS_MAX_SUITES {
            return -1;
        }
        (*registry_mut())[*registry_count_mut()] = Some(desc);
        *registry_count_mut() += 1;
    }
    0
}

/// Register every builtin validation suite with the harness.
pub fn tests_register_builtin_suites() {
    register_test_suites!(
        tests_register_suite,
        suites::VECTOR_TABLE_SUITE_DESC,
        suites::TRAP_DISPATCH_SUITE_DESC,
        suites::IRQ_LINES_SUITE_DESC,
        suites::SYSCALL_TABLE_SUITE_DESC,
    );
}

/// Run every registered suite whose mask bit is set in `suite_mask`.
///
/// Returns 0 when all selected suites pass, -1 otherwise.
pub fn tests_run_all(suite_mask: u32, summary: &mut TestRunSummary) -> i32 {
    *summary = TestRunSummary::default();

    klog_info!("TESTS: Starting test suites");

    let mut desc_list: [Option<&'static TestSuiteDesc>; HARNESS_MAX_SUITES] =
        [None; HARNESS_MAX_SUITES];
    let mut desc_count = unsafe { *registry_count_mut() };
    if desc_count > HARNESS_MAX_SUITES {
        desc_count = HARNESS_MAX_SUITES;
    }
    for (slot, entry) in desc_list.iter_mut().zip(0..desc_count) {
        *slot = unsafe { (*registry_mut())[entry] };
    }

    let start_cycles = tsc::rdtsc();
    for (idx, entry) in desc_list.iter().enumerate().take(desc_count) {
        let Some(desc) = entry else { continue };

        if (suite_mask & desc.mask_bit) == 0 {
            continue;
        }

        let mut res = TestSuiteResult::new(desc.name);
        if let Some(run) = desc.run {
            let _ = run(&(), &mut res);
        }

        if summary.suite_count < HARNESS_MAX_SUITES {
            summary.suites[summary.suite_count] = res;
            summary.suite_count += 1;
        }
        summary.add_suite_result(&res);

        klog_info!(
            "SUITE{} total={} pass={} fail={} elapsed={}ms",
            idx as u32,
            res.total,
            res.passed,
            res.failed,
            res.elapsed_ms,
        );
    }
    let overall_ms = measure_elapsed_ms(start_cycles, tsc::rdtsc());
    if overall_ms > summary.elapsed_ms {
        summary.elapsed_ms = overall_ms;
    }

    klog_info!(
        "TESTS SUMMARY: total={} passed={} failed={} elapsed_ms={}",
        summary.total_tests,
        summary.passed,
        summary.failed,
        summary.elapsed_ms,
    );

    if summary.failed == 0 { 0 } else { -1 }
}

mod suites {
    use vexos_lib::define_test_suite;
    use vexos_lib::testing::{SUITE_DISPATCH, SUITE_IRQ, SUITE_SYSCALL, SUITE_VECTOR};

    use vexos_boot::tests::{
        test_build_fills_every_slot, test_build_routes_planned_vectors,
        test_build_syscall_gate_dpl, test_gate_encodes_full_offset,
        test_plan_covers_expected_vectors, test_plan_error_code_vectors,
    };
    use vexos_core::syscall::tests::{
        test_dispatch_every_valid_number, test_dispatch_passes_register_args,
        test_dispatch_rejects_number_zero, test_dispatch_rejects_out_of_range,
        test_dispatch_routes_first_and_last, test_handler_lookup_bounds,
        test_request_decodes_frame,
    };
    use vexos_core::trap::tests::{
        test_classify_exception_vectors, test_classify_irq_vectors, test_classify_syscall_vector,
        test_deliver_pending_user_origin_only, test_exception_kernel_disposition_fatal,
        test_exception_user_divide_raises_divzero, test_exception_user_fault_raises_segfault,
        test_irq_counts_accumulate, test_irq_dispatch_callback_then_eoi,
        test_irq_dispatch_unhandled_line_eois, test_irq_register_invalid_line,
        test_irq_register_unmask_mask, test_irq_replace_and_unregister,
        test_signal_mapping_collapses_to_segfault, test_syscall_invalid_number_sets_failure,
        test_syscall_result_written_to_eax, test_unknown_vector_is_ignored,
    };

    define_test_suite!(
        vector_table,
        SUITE_VECTOR,
        [
            test_plan_covers_expected_vectors,
            test_plan_error_code_vectors,
            test_build_fills_every_slot,
            test_build_routes_planned_vectors,
            test_build_syscall_gate_dpl,
            test_gate_encodes_full_offset,
        ]
    );

    define_test_suite!(
        trap_dispatch,
        SUITE_DISPATCH,
        [
            test_classify_exception_vectors,
            test_classify_irq_vectors,
            test_classify_syscall_vector,
            test_exception_kernel_disposition_fatal,
            test_exception_user_divide_raises_divzero,
            test_exception_user_fault_raises_segfault,
            test_signal_mapping_collapses_to_segfault,
            test_deliver_pending_user_origin_only,
            test_syscall_result_written_to_eax,
            test_syscall_invalid_number_sets_failure,
            test_unknown_vector_is_ignored,
        ]
    );

    define_test_suite!(
        irq_lines,
        SUITE_IRQ,
        [
            test_irq_register_invalid_line,
            test_irq_register_unmask_mask,
            test_irq_dispatch_callback_then_eoi,
            test_irq_dispatch_unhandled_line_eois,
            test_irq_counts_accumulate,
            test_irq_replace_and_unregister,
        ]
    );

    define_test_suite!(
        syscall_table,
        SUITE_SYSCALL,
        [
            test_dispatch_rejects_number_zero,
            test_dispatch_rejects_out_of_range,
            test_dispatch_routes_first_and_last,
            test_dispatch_every_valid_number,
            test_dispatch_passes_register_args,
            test_handler_lookup_bounds,
            test_request_decodes_frame,
        ]
    );
}
