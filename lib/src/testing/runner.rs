use super::TestResult;

pub fn run_single_test(name: &str, test_fn: impl FnOnce() -> TestResult) -> TestResult {
    let result = test_fn();
    if result.is_failure() {
        crate::klog_info!("TEST FAIL: {}", name);
    }
    result
}
