//! Trap frame layout and interrupt vector constants.
//!
//! The `TrapFrame` struct mirrors, field for field, the stack image built by
//! the per-vector trampolines before they hand control to the dispatcher.
//! Fields are ordered from the lowest stack address (pushed last) to the
//! highest (pushed first by the CPU itself).

use bitflags::bitflags;

// =============================================================================
// Segment Selectors
// =============================================================================

/// Kernel code segment selector.
pub const KERNEL_CS: u32 = 0x0010;
/// Kernel data segment selector.
pub const KERNEL_DS: u32 = 0x0018;
/// User code segment selector (RPL 3).
pub const USER_CS: u32 = 0x0023;
/// User data segment selector (RPL 3).
pub const USER_DS: u32 = 0x002B;

/// Requested privilege level mask on a segment selector.
pub const SELECTOR_RPL_MASK: u32 = 0x3;
/// Ring 3 requested privilege level.
pub const RPL_USER: u32 = 0x3;

// =============================================================================
// Vector Layout
// =============================================================================

/// Number of entries in the interrupt descriptor table.
pub const IDT_ENTRIES: usize = 256;

/// Number of CPU-defined exception vectors handled by the kernel.
pub const EXCEPTION_COUNT: u8 = 20;

/// First vector of the contiguous IRQ block (PIC remap target).
pub const IRQ_BASE_VECTOR: u8 = 0x20;

/// Number of IRQ lines on the cascaded 8259 pair.
pub const IRQ_LINE_COUNT: usize = 16;

/// Last vector of the IRQ block, inclusive.
pub const IRQ_LAST_VECTOR: u8 = IRQ_BASE_VECTOR + IRQ_LINE_COUNT as u8 - 1;

/// The system call vector, the only user-callable gate.
pub const SYSCALL_VECTOR: u8 = 0x80;

bitflags! {
    /// EFLAGS register bits the kernel inspects or reports.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Eflags: u32 {
        const CARRY = 1 << 0;
        const ZERO = 1 << 6;
        const SIGN = 1 << 7;
        const TRAP = 1 << 8;
        const INTERRUPT_ENABLE = 1 << 9;
        const DIRECTION = 1 << 10;
        const OVERFLOW = 1 << 11;
    }
}

// =============================================================================
// Trap Frame
// =============================================================================

/// Uniform machine-state snapshot passed to the trap dispatcher.
///
/// Built by the trampolines: the CPU pushes the tail (EFLAGS/CS/EIP and,
/// for some exceptions, an error code; ESP/SS only on a privilege change),
/// the vector stub normalizes the error code and tags the vector, and the
/// common path saves the general-purpose registers, data segment selectors,
/// and control registers.
///
/// Mutation contract: handlers treat the frame as read-only. The syscall
/// gate writes `eax` (return value) and the signal-delivery hook may
/// rewrite `eip` and `esp` to redirect a user return into a handler.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct TrapFrame {
    pub cr4: u32,
    pub cr3: u32,
    pub cr2: u32,
    pub cr0: u32,
    pub gs: u32,
    pub fs: u32,
    pub es: u32,
    pub ds: u32,
    pub edi: u32,
    pub esi: u32,
    pub ebp: u32,
    /// ESP as captured by `pushal`; points into the kernel trap stack.
    pub esp_saved: u32,
    pub ebx: u32,
    pub edx: u32,
    pub ecx: u32,
    pub eax: u32,
    pub vector: u32,
    /// Hardware error code, zero for vectors that push none.
    pub error_code: u32,
    pub eip: u32,
    pub cs: u32,
    pub eflags: u32,
    /// User stack pointer; valid only when the trap crossed from ring 3.
    pub esp: u32,
    /// User stack segment; valid only when the trap crossed from ring 3.
    pub ss: u32,
}

impl TrapFrame {
    /// Whether the interrupted code was running in ring 3.
    #[inline]
    pub const fn is_user_origin(&self) -> bool {
        self.cs & SELECTOR_RPL_MASK == RPL_USER
    }

    /// Whether the CPU pushed a user ESP/SS pair (privilege change).
    #[inline]
    pub const fn has_user_stack(&self) -> bool {
        self.is_user_origin()
    }

    /// A zeroed frame with kernel-origin CS, useful for boot-time records.
    pub const fn empty() -> Self {
        Self {
            cr4: 0,
            cr3: 0,
            cr2: 0,
            cr0: 0,
            gs: 0,
            fs: 0,
            es: 0,
            ds: 0,
            edi: 0,
            esi: 0,
            ebp: 0,
            esp_saved: 0,
            ebx: 0,
            edx: 0,
            ecx: 0,
            eax: 0,
            vector: 0,
            error_code: 0,
            eip: 0,
            cs: KERNEL_CS,
            eflags: 0,
            esp: 0,
            ss: 0,
        }
    }
}

// =============================================================================
// Exception Kinds
// =============================================================================

/// CPU-defined exception vectors 0 through 19.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExceptionKind {
    DivideError = 0,
    Debug = 1,
    NonMaskableInterrupt = 2,
    Breakpoint = 3,
    Overflow = 4,
    BoundRangeExceeded = 5,
    InvalidOpcode = 6,
    DeviceNotAvailable = 7,
    DoubleFault = 8,
    CoprocessorSegmentOverrun = 9,
    InvalidTss = 10,
    SegmentNotPresent = 11,
    StackSegmentFault = 12,
    GeneralProtectionFault = 13,
    PageFault = 14,
    Reserved15 = 15,
    X87FloatingPoint = 16,
    AlignmentCheck = 17,
    MachineCheck = 18,
    SimdFloatingPoint = 19,
}

impl ExceptionKind {
    /// Map a vector number to its exception kind, if it is one.
    pub const fn from_vector(vector: u32) -> Option<Self> {
        let kind = match vector {
            0 => Self::DivideError,
            1 => Self::Debug,
            2 => Self::NonMaskableInterrupt,
            3 => Self::Breakpoint,
            4 => Self::Overflow,
            5 => Self::BoundRangeExceeded,
            6 => Self::InvalidOpcode,
            7 => Self::DeviceNotAvailable,
            8 => Self::DoubleFault,
            9 => Self::CoprocessorSegmentOverrun,
            10 => Self::InvalidTss,
            11 => Self::SegmentNotPresent,
            12 => Self::StackSegmentFault,
            13 => Self::GeneralProtectionFault,
            14 => Self::PageFault,
            15 => Self::Reserved15,
            16 => Self::X87FloatingPoint,
            17 => Self::AlignmentCheck,
            18 => Self::MachineCheck,
            19 => Self::SimdFloatingPoint,
            _ => return None,
        };
        Some(kind)
    }

    /// The vector number of this exception.
    #[inline]
    pub const fn vector(self) -> u8 {
        self as u8
    }

    /// Whether the CPU pushes a hardware error code for this exception.
    pub const fn has_error_code(self) -> bool {
        matches!(
            self,
            Self::DoubleFault
                | Self::InvalidTss
                | Self::SegmentNotPresent
                | Self::StackSegmentFault
                | Self::GeneralProtectionFault
                | Self::PageFault
                | Self::AlignmentCheck
        )
    }

    /// Human-readable architectural name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DivideError => "Divide Error",
            Self::Debug => "Debug",
            Self::NonMaskableInterrupt => "Non-Maskable Interrupt",
            Self::Breakpoint => "Breakpoint",
            Self::Overflow => "Overflow",
            Self::BoundRangeExceeded => "BOUND Range Exceeded",
            Self::InvalidOpcode => "Invalid Opcode",
            Self::DeviceNotAvailable => "Device Not Available",
            Self::DoubleFault => "Double Fault",
            Self::CoprocessorSegmentOverrun => "Coprocessor Segment Overrun",
            Self::InvalidTss => "Invalid TSS",
            Self::SegmentNotPresent => "Segment Not Present",
            Self::StackSegmentFault => "Stack-Segment Fault",
            Self::GeneralProtectionFault => "General Protection Fault",
            Self::PageFault => "Page Fault",
            Self::Reserved15 => "Reserved",
            Self::X87FloatingPoint => "x87 Floating-Point Error",
            Self::AlignmentCheck => "Alignment Check",
            Self::MachineCheck => "Machine Check",
            Self::SimdFloatingPoint => "SIMD Floating-Point Exception",
        }
    }
}
