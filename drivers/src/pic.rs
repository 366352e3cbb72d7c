//! 8259 programmable interrupt controller driver.
//!
//! The cascaded master/slave pair is remapped so hardware lines land on
//! the contiguous IRQ vector block instead of colliding with CPU
//! exceptions. All lines come up masked; registration through the trap
//! core unmasks them one at a time.

use vexos_abi::ports::{
    PIC1_COMMAND, PIC1_DATA, PIC2_COMMAND, PIC2_DATA, PIC_CASCADE_LINE, PIC_EOI,
};
use vexos_abi::trap::{IRQ_BASE_VECTOR, IRQ_LINE_COUNT};
use vexos_core::trap::InterruptController;
use vexos_lib::io;

// ICW1: begin initialization, expect ICW4.
const ICW1_INIT: u8 = 0x10;
const ICW1_ICW4: u8 = 0x01;
// ICW4: 8086 mode.
const ICW4_8086: u8 = 0x01;

/// Driver handle for the cascaded 8259 pair.
pub struct Pic8259;

impl Pic8259 {
    pub const fn new() -> Self {
        Self
    }

    /// Remap both chips onto the IRQ vector block and mask every line.
    pub fn init(&self) {
        unsafe {
            io::outb(PIC1_COMMAND, ICW1_INIT | ICW1_ICW4);
            io::io_wait();
            io::outb(PIC2_COMMAND, ICW1_INIT | ICW1_ICW4);
            io::io_wait();

            // ICW2: vector offsets for master and slave.
            io::outb(PIC1_DATA, IRQ_BASE_VECTOR);
            io::io_wait();
            io::outb(PIC2_DATA, IRQ_BASE_VECTOR + 8);
            io::io_wait();

            // ICW3: slave wired to the master's cascade input.
            io::outb(PIC1_DATA, 1 << PIC_CASCADE_LINE);
            io::io_wait();
            io::outb(PIC2_DATA, PIC_CASCADE_LINE);
            io::io_wait();

            io::outb(PIC1_DATA, ICW4_8086);
            io::io_wait();
            io::outb(PIC2_DATA, ICW4_8086);
            io::io_wait();
        }
        mask_all();
    }
}

impl Default for Pic8259 {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptController for Pic8259 {
    fn end_of_interrupt(&self, line: u8) {
        if line as usize >= IRQ_LINE_COUNT {
            return;
        }
        unsafe {
            // Slave lines acknowledge both chips.
            if line >= 8 {
                io::outb(PIC2_COMMAND, PIC_EOI);
            }
            io::outb(PIC1_COMMAND, PIC_EOI);
        }
    }

    fn mask_line(&self, line: u8) {
        if line as usize >= IRQ_LINE_COUNT {
            return;
        }
        let (port, bit) = data_port_and_bit(line);
        unsafe {
            let mask = io::inb(port);
            io::outb(port, mask | (1 << bit));
        }
    }

    fn unmask_line(&self, line: u8) {
        if line as usize >= IRQ_LINE_COUNT {
            return;
        }
        let (port, bit) = data_port_and_bit(line);
        unsafe {
            let mask = io::inb(port);
            io::outb(port, mask & !(1 << bit));
        }
        // A slave line is only deliverable while the cascade input on the
        // master is open as well.
        if line >= 8 {
            self.unmask_line(PIC_CASCADE_LINE);
        }
    }
}

fn data_port_and_bit(line: u8) -> (u16, u8) {
    if line < 8 {
        (PIC1_DATA, line)
    } else {
        (PIC2_DATA, line - 8)
    }
}

/// Mask every line on both chips.
pub fn mask_all() {
    unsafe {
        io::outb(PIC1_DATA, 0xFF);
        io::outb(PIC2_DATA, 0xFF);
    }
}

/// Mask everything and flush any in-flight acknowledgement.
pub fn quiesce() {
    mask_all();
    unsafe {
        io::outb(PIC1_COMMAND, PIC_EOI);
        io::outb(PIC2_COMMAND, PIC_EOI);
    }
}
