//! VexOS Kernel-Userland ABI Types
//!
//! This crate provides the canonical definitions for all types shared between
//! the kernel and userland: the trap frame layout, vector and selector
//! constants, syscall numbers, signal kinds, and the I/O port map. Having a
//! single source of truth eliminates:
//! - Duplicate constant definitions across crates
//! - ABI mismatches between the trampoline assembly and Rust
//! - The need for unsafe FFI conversions
//!
//! All types in this crate are `#[repr(C)]` for ABI stability.

#![no_std]
#![forbid(unsafe_code)]

pub mod error;
pub mod ports;
pub mod signal;
pub mod syscall;
pub mod trap;

pub use error::*;
pub use signal::*;
pub use syscall::*;
pub use trap::*;
