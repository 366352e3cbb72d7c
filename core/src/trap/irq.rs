//! Per-line IRQ handler registry.

use vexos_abi::error::IrqError;
use vexos_abi::trap::IRQ_LINE_COUNT;
use vexos_lib::IrqMutex;

/// Callback invoked when a registered hardware interrupt fires.
pub type IrqHandlerFn = fn();

#[derive(Clone, Copy)]
struct IrqSlot {
    handler: Option<IrqHandlerFn>,
    count: u64,
}

impl IrqSlot {
    const fn empty() -> Self {
        Self {
            handler: None,
            count: 0,
        }
    }
}

/// Registration table for the 16 cascaded controller lines.
///
/// The slot lock is held only long enough to snapshot the callback, never
/// across the call itself.
pub struct IrqRegistry {
    lines: IrqMutex<[IrqSlot; IRQ_LINE_COUNT]>,
}

impl IrqRegistry {
    pub const fn new() -> Self {
        Self {
            lines: IrqMutex::new([IrqSlot::empty(); IRQ_LINE_COUNT]),
        }
    }

    /// Install `handler` on `line`, replacing any previous registration.
    pub fn register(&self, line: u8, handler: IrqHandlerFn) -> Result<(), IrqError> {
        let slot = Self::index(line)?;
        self.lines.lock()[slot].handler = Some(handler);
        Ok(())
    }

    /// Remove the handler on `line`. Clearing an empty line is a no-op.
    pub fn unregister(&self, line: u8) -> Result<(), IrqError> {
        let slot = Self::index(line)?;
        self.lines.lock()[slot].handler = None;
        Ok(())
    }

    /// Record an interrupt on `line` and return the callback to invoke.
    pub(crate) fn note_interrupt(&self, line: u8) -> Option<IrqHandlerFn> {
        let slot = Self::index(line).ok()?;
        let mut lines = self.lines.lock();
        lines[slot].count = lines[slot].count.wrapping_add(1);
        lines[slot].handler
    }

    /// Whether `line` currently has a handler installed.
    pub fn is_registered(&self, line: u8) -> bool {
        match Self::index(line) {
            Ok(slot) => self.lines.lock()[slot].handler.is_some(),
            Err(_) => false,
        }
    }

    /// Interrupts observed on `line`, including unhandled ones.
    pub fn count(&self, line: u8) -> u64 {
        match Self::index(line) {
            Ok(slot) => self.lines.lock()[slot].count,
            Err(_) => 0,
        }
    }

    fn index(line: u8) -> Result<usize, IrqError> {
        let slot = line as usize;
        if slot >= IRQ_LINE_COUNT {
            return Err(IrqError::InvalidLine);
        }
        Ok(slot)
    }
}

impl Default for IrqRegistry {
    fn default() -> Self {
        Self::new()
    }
}
