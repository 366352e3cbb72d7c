#![no_std]
#![no_main]
#![forbid(unsafe_op_in_unsafe_fn)]

use core::panic::PanicInfo;

use vexos_abi::signal::SignalKind;
use vexos_abi::syscall::SYSCALL_FAILURE;
use vexos_abi::trap::TrapFrame;
use vexos_core::syscall::{SyscallRequest, SyscallTable};
use vexos_core::trap::{trap_core_install, ProcessProvider, SignalOutbox, TrapCore};
use vexos_drivers::pic::Pic8259;
use vexos_drivers::{serial, serial_println};
use vexos_lib::cpu;
use vexos_lib::{klog_attach_serial, klog_debug, klog_info, klog_init};

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    serial::init();
    serial_println!("Kernel panic: {info}");
    cpu::halt_loop();
}

static PIC: Pic8259 = Pic8259::new();

/// Signal sink used until a process subsystem takes over delivery.
struct BootOutbox;

impl SignalOutbox for BootOutbox {
    fn raise(&self, pid: u32, kind: SignalKind) {
        klog_debug!("SIGNAL: pid {} raised {:?}, no delivery target yet", pid, kind);
    }

    fn deliver_pending(&self, _frame: &mut TrapFrame) {}
}

struct BootProcess;

impl ProcessProvider for BootProcess {
    fn current_pid(&self) -> u32 {
        0
    }
}

static OUTBOX: BootOutbox = BootOutbox;
static PROCESSES: BootProcess = BootProcess;

// =============================================================================
// SYSCALL TABLE
// =============================================================================

fn reject(name: &str) -> i32 {
    klog_debug!("SYSCALL: {} awaiting process layer", name);
    SYSCALL_FAILURE
}

fn sys_halt(_request: SyscallRequest<'_>) -> i32 {
    reject("halt")
}

fn sys_execute(_request: SyscallRequest<'_>) -> i32 {
    reject("execute")
}

fn sys_read(_request: SyscallRequest<'_>) -> i32 {
    reject("read")
}

fn sys_write(_request: SyscallRequest<'_>) -> i32 {
    reject("write")
}

fn sys_open(_request: SyscallRequest<'_>) -> i32 {
    reject("open")
}

fn sys_close(_request: SyscallRequest<'_>) -> i32 {
    reject("close")
}

fn sys_getargs(_request: SyscallRequest<'_>) -> i32 {
    reject("getargs")
}

fn sys_vidmap(_request: SyscallRequest<'_>) -> i32 {
    reject("vidmap")
}

fn sys_set_handler(_request: SyscallRequest<'_>) -> i32 {
    reject("set_handler")
}

fn sys_sigreturn(_request: SyscallRequest<'_>) -> i32 {
    reject("sigreturn")
}

const fn boot_syscall_table() -> SyscallTable {
    SyscallTable::new([
        sys_halt,
        sys_execute,
        sys_read,
        sys_write,
        sys_open,
        sys_close,
        sys_getargs,
        sys_vidmap,
        sys_set_handler,
        sys_sigreturn,
    ])
}

// =============================================================================
// BUILTIN TESTS
// =============================================================================

#[cfg(feature = "builtin-tests")]
fn run_builtin_tests() {
    use vexos_lib::klog_error;
    use vexos_lib::testing::{TestRunSummary, SUITE_ALL};
    use vexos_tests::{tests_register_builtin_suites, tests_reset_registry, tests_run_all};

    tests_reset_registry();
    tests_register_builtin_suites();

    let mut summary = TestRunSummary::default();
    if tests_run_all(SUITE_ALL, &mut summary) == 0 {
        klog_info!("Builtin tests passed");
    } else {
        klog_error!("Builtin tests FAILED");
    }
}

// =============================================================================
// ENTRY
// =============================================================================

#[unsafe(no_mangle)]
pub extern "C" fn _start() -> ! {
    serial::init();
    klog_init();
    klog_attach_serial();
    klog_info!("VexOS kernel booting");

    PIC.init();

    trap_core_install(TrapCore::new(
        boot_syscall_table(),
        &PIC,
        &OUTBOX,
        &PROCESSES,
    ));

    #[cfg(target_arch = "x86")]
    vexos_boot::idt_init();

    #[cfg(feature = "builtin-tests")]
    run_builtin_tests();

    klog_info!("Boot complete, idling");
    cpu::halt_loop()
}
