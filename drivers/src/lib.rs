#![no_std]
#![forbid(unsafe_op_in_unsafe_fn)]

pub mod pic;
pub mod serial;

pub use pic::Pic8259;
