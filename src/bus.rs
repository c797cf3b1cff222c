//! Register bus abstraction.
//!
//! All hardware access in this crate goes through the [`RegisterBus`] trait,
//! which models the logiWIN register window as a flat 32-bit offset space.
//! This allows for mock implementations in tests.

use std::time::{Duration, Instant};

/// Trait for register bus implementations.
///
/// Offsets are byte offsets from the start of the logiWIN register window.
pub trait RegisterBus {
    /// Read a 32-bit register at the given byte offset.
    fn read32(&mut self, offset: u32) -> u32;

    /// Write a 32-bit register at the given byte offset.
    fn write32(&mut self, offset: u32, value: u32);

    /// Block the calling thread for at least `us` microseconds.
    ///
    /// Used by the quiesce sequences that must let the pipeline settle
    /// between control register writes. The default implementation
    /// busy-waits; test doubles override it to record the delay instead.
    fn delay_us(&mut self, us: u32) {
        let deadline = Instant::now() + Duration::from_micros(u64::from(us));
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }
}

/// Memory-mapped register bus over the logiWIN hardware window.
///
/// Performs volatile 32-bit accesses relative to a raw base pointer, the
/// way the register block appears once the device has been mapped into the
/// address space.
pub struct MmioBus {
    base: *mut u8,
}

// Safety: the bus only dereferences base through volatile accesses inside
// the mapped window the constructor contract guarantees.
unsafe impl Send for MmioBus {}

impl MmioBus {
    /// Create a bus over a mapped logiWIN register window.
    ///
    /// # Safety
    ///
    /// `base` must point to a live mapping of the logiWIN register block
    /// covering the whole window including the stencil mask BRAM
    /// (`MASK_BRAM_OFFSET + 2 * MAX_VMEM_STRIDE` bytes), valid for volatile
    /// reads and writes for the lifetime of the returned bus.
    pub unsafe fn new(base: *mut u8) -> Self {
        Self { base }
    }
}

impl RegisterBus for MmioBus {
    fn read32(&mut self, offset: u32) -> u32 {
        unsafe { std::ptr::read_volatile(self.base.add(offset as usize).cast::<u32>()) }
    }

    fn write32(&mut self, offset: u32, value: u32) {
        unsafe { std::ptr::write_volatile(self.base.add(offset as usize).cast::<u32>(), value) }
    }
}
