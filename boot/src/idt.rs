//! Interrupt descriptor table construction and install.
//!
//! Gate population is driven by a declarative vector plan: one record per
//! planned vector naming its dispatch class and whether the CPU pushes an
//! error code. The trampoline file mirrors the same plan, so the uniform
//! frame contract has a single authoritative table.

use bitflags::bitflags;

use vexos_abi::trap::{
    ExceptionKind, EXCEPTION_COUNT, IDT_ENTRIES, IRQ_BASE_VECTOR, IRQ_LINE_COUNT, KERNEL_CS,
    SYSCALL_VECTOR,
};

bitflags! {
    /// Attribute byte of an 8-byte protected-mode gate descriptor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GateAttributes: u8 {
        const PRESENT = 0x80;
        const DPL_USER = 0x60;
        const INTERRUPT_GATE = 0x0E;
    }
}

/// Role a planned vector serves in dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorClass {
    Exception,
    Irq,
    Syscall,
}

/// One planned gate: vector number, whether the CPU pushes an error code
/// for it, and the class its trampoline tags the frame with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorPlan {
    pub vector: u8,
    pub has_error_code: bool,
    pub class: VectorClass,
}

pub const VECTOR_PLAN_LEN: usize = EXCEPTION_COUNT as usize + IRQ_LINE_COUNT + 1;

/// Every vector that gets a dedicated trampoline: the 20 exceptions, the
/// 16 remapped IRQ lines, and the syscall gate.
pub const VECTOR_PLAN: [VectorPlan; VECTOR_PLAN_LEN] = build_vector_plan();

const fn exception_pushes_error_code(vector: u8) -> bool {
    match ExceptionKind::from_vector(vector as u32) {
        Some(kind) => kind.has_error_code(),
        None => false,
    }
}

const fn build_vector_plan() -> [VectorPlan; VECTOR_PLAN_LEN] {
    let mut plan = [VectorPlan {
        vector: 0,
        has_error_code: false,
        class: VectorClass::Exception,
    }; VECTOR_PLAN_LEN];

    let mut vector = 0u8;
    while vector < EXCEPTION_COUNT {
        plan[vector as usize] = VectorPlan {
            vector,
            has_error_code: exception_pushes_error_code(vector),
            class: VectorClass::Exception,
        };
        vector += 1;
    }

    let mut line = 0usize;
    while line < IRQ_LINE_COUNT {
        plan[EXCEPTION_COUNT as usize + line] = VectorPlan {
            vector: IRQ_BASE_VECTOR + line as u8,
            has_error_code: false,
            class: VectorClass::Irq,
        };
        line += 1;
    }

    plan[VECTOR_PLAN_LEN - 1] = VectorPlan {
        vector: SYSCALL_VECTOR,
        has_error_code: false,
        class: VectorClass::Syscall,
    };
    plan
}

/// One 8-byte protected-mode gate descriptor.
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct IdtEntry {
    offset_low: u16,
    selector: u16,
    zero: u8,
    attributes: u8,
    offset_high: u16,
}

impl IdtEntry {
    const fn missing() -> Self {
        Self {
            offset_low: 0,
            selector: 0,
            zero: 0,
            attributes: 0,
            offset_high: 0,
        }
    }

    fn gate(handler: u32, attributes: GateAttributes) -> Self {
        Self {
            offset_low: (handler & 0xFFFF) as u16,
            selector: KERNEL_CS as u16,
            zero: 0,
            attributes: attributes.bits(),
            offset_high: (handler >> 16) as u16,
        }
    }

    /// Reassembled handler address.
    pub fn handler(&self) -> u32 {
        let low = self.offset_low;
        let high = self.offset_high;
        ((high as u32) << 16) | low as u32
    }

    pub fn selector(&self) -> u16 {
        self.selector
    }

    pub fn attributes(&self) -> GateAttributes {
        GateAttributes::from_bits_retain(self.attributes)
    }

    pub fn is_present(&self) -> bool {
        self.attributes().contains(GateAttributes::PRESENT)
    }

    /// Descriptor privilege level (0..=3).
    pub fn dpl(&self) -> u8 {
        (self.attributes >> 5) & 0x3
    }
}

/// The full 256-entry table.
#[repr(C, align(8))]
pub struct Idt {
    entries: [IdtEntry; IDT_ENTRIES],
}

impl Idt {
    pub const fn empty() -> Self {
        Self {
            entries: [IdtEntry::missing(); IDT_ENTRIES],
        }
    }

    /// Build the complete table from trampoline addresses.
    ///
    /// Every vector outside the plan gets the shared unknown-vector
    /// trampoline, so no gate is ever absent. Planned vectors overwrite
    /// their slots; the syscall gate alone carries DPL 3.
    pub fn build(resolve: impl Fn(&VectorPlan) -> u32, unknown_handler: u32) -> Self {
        let kernel_gate = GateAttributes::PRESENT.union(GateAttributes::INTERRUPT_GATE);
        let mut idt = Self::empty();
        for entry in idt.entries.iter_mut() {
            *entry = IdtEntry::gate(unknown_handler, kernel_gate);
        }
        for plan in VECTOR_PLAN.iter() {
            let attributes = match plan.class {
                VectorClass::Syscall => kernel_gate.union(GateAttributes::DPL_USER),
                VectorClass::Exception | VectorClass::Irq => kernel_gate,
            };
            idt.entries[plan.vector as usize] = IdtEntry::gate(resolve(plan), attributes);
        }
        idt
    }

    pub fn entry(&self, vector: u8) -> &IdtEntry {
        &self.entries[vector as usize]
    }
}

#[cfg(target_arch = "x86")]
mod install {
    use super::Idt;
    use crate::trampoline;

    static mut IDT: Idt = Idt::empty();

    #[repr(C, packed)]
    struct IdtPointer {
        limit: u16,
        base: u32,
    }

    /// Build the table from the trampoline addresses and execute `lidt`.
    ///
    /// Runs once at boot, before interrupts are enabled.
    pub fn idt_init() {
        let table = Idt::build(trampoline::stub_address, trampoline::unknown_stub_address());
        unsafe {
            IDT = table;
            let pointer = IdtPointer {
                limit: (core::mem::size_of::<Idt>() - 1) as u16,
                base: (&raw const IDT) as u32,
            };
            core::arch::asm!(
                "lidt [{0}]",
                in(reg) &pointer,
                options(readonly, nostack, preserves_flags)
            );
        }
    }
}

#[cfg(target_arch = "x86")]
pub use install::idt_init;
