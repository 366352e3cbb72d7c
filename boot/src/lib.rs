#![no_std]

pub mod idt;
pub mod tests;
#[cfg(target_arch = "x86")]
mod trampoline;

#[cfg(target_arch = "x86")]
pub use idt::idt_init;
pub use idt::{GateAttributes, Idt, IdtEntry, VectorClass, VectorPlan, VECTOR_PLAN};
