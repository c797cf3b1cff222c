//! Mock register bus for testing.

use crate::bus::RegisterBus;
use crate::regs;

/// Size in bytes of the emulated register window, stencil BRAM included.
const WINDOW_BYTES: u32 = regs::MASK_BRAM_OFFSET + 2 * regs::MAX_VMEM_STRIDE;

/// A mock register bus for testing.
///
/// Emulates the logiWIN register window as an in-memory register file and
/// journals every write and settle delay, so code driving a
/// [`FrameGrabber`](crate::FrameGrabber) can be tested without an FPGA.
///
/// # Example
///
/// ```
/// use logiwin::{MockBus, RegisterBus};
///
/// let mut bus = MockBus::new();
/// bus.write32(0x30, 0x1);
/// assert_eq!(bus.reg(0x30), 0x1);
/// assert_eq!(bus.writes(), &[(0x30, 0x1)]);
/// ```
pub struct MockBus {
    regs: Vec<u32>,
    writes: Vec<(u32, u32)>,
    delays: Vec<u32>,
}

impl MockBus {
    /// Create a mock bus with all registers at zero.
    pub fn new() -> Self {
        Self {
            regs: vec![0; (WINDOW_BYTES / 4) as usize],
            writes: Vec::new(),
            delays: Vec::new(),
        }
    }

    fn slot(&self, offset: u32) -> usize {
        assert!(
            offset < WINDOW_BYTES && offset % 4 == 0,
            "register offset {offset:#x} outside the emulated window"
        );
        (offset / 4) as usize
    }

    /// Current value of the register at `offset`, without journaling a read.
    pub fn reg(&self, offset: u32) -> u32 {
        self.regs[self.slot(offset)]
    }

    /// Preload a register value, e.g. the resolution readback register.
    pub fn set_reg(&mut self, offset: u32, value: u32) {
        let slot = self.slot(offset);
        self.regs[slot] = value;
    }

    /// All `(offset, value)` writes performed so far, in order.
    pub fn writes(&self) -> &[(u32, u32)] {
        &self.writes
    }

    /// Values written to `offset` so far, in order.
    pub fn writes_to(&self, offset: u32) -> Vec<u32> {
        self.writes
            .iter()
            .filter(|(o, _)| *o == offset)
            .map(|(_, v)| *v)
            .collect()
    }

    /// The most recent value written to `offset`, if any.
    pub fn last_write(&self, offset: u32) -> Option<u32> {
        self.writes_to(offset).last().copied()
    }

    /// Number of settle delays requested so far.
    pub fn delay_count(&self) -> usize {
        self.delays.len()
    }

    /// Total requested settle time in microseconds.
    pub fn total_delay_us(&self) -> u32 {
        self.delays.iter().sum()
    }

    /// Forget the journaled writes and delays, keeping register contents.
    pub fn clear_journal(&mut self) {
        self.writes.clear();
        self.delays.clear();
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for MockBus {
    fn read32(&mut self, offset: u32) -> u32 {
        self.reg(offset)
    }

    fn write32(&mut self, offset: u32, value: u32) {
        let slot = self.slot(offset);
        self.regs[slot] = value;
        self.writes.push((offset, value));
    }

    fn delay_us(&mut self, us: u32) {
        self.delays.push(us);
    }
}
