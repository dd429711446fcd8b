//! In-memory register file
//!
//! [`MemoryBus`] stands in for a real register block on the host. It keeps
//! one word per register, decodes the XOR/SET/CLR views the same way the
//! bus fabric does, and remembers the most recent writes so tests can check
//! the exact sequence a driver issued.
//!
//! Two hardware behaviours can be modelled per register:
//! - self-clearing strobe bits, which always read back as zero
//! - write-one-to-clear flags, where writing 1 clears and writing 0 keeps

use core::cell::{Cell, RefCell};

use heapless::{HistoryBuffer, Vec};

use crate::register::{Alias, RegisterBus};

/// Number of writes remembered by a [`MemoryBus`]
pub const HISTORY_LEN: usize = 128;

/// One recorded register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Access {
    /// Byte offset of the register written
    pub offset: usize,
    /// View the write went through
    pub alias: Alias,
    /// Value put on the bus
    pub value: u32,
}

/// Register file of `WORDS` 32-bit registers backed by plain memory
pub struct MemoryBus<const WORDS: usize> {
    words: [Cell<u32>; WORDS],
    self_clearing: [u32; WORDS],
    write_one_to_clear: [u32; WORDS],
    history: RefCell<HistoryBuffer<Access, HISTORY_LEN>>,
}

impl<const WORDS: usize> Default for MemoryBus<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> MemoryBus<WORDS> {
    /// Create a register file with every register reading zero
    pub fn new() -> Self {
        Self {
            words: core::array::from_fn(|_| Cell::new(0)),
            self_clearing: [0; WORDS],
            write_one_to_clear: [0; WORDS],
            history: RefCell::new(HistoryBuffer::new()),
        }
    }

    /// Set the value a register holds before the first write
    pub fn with_reset_value(self, offset: usize, value: u32) -> Self {
        self.words[Self::index(offset)].set(value);
        self
    }

    /// Mark bits of a register as strobes that read back as zero
    pub fn with_self_clearing(mut self, offset: usize, mask: u32) -> Self {
        self.self_clearing[Self::index(offset)] |= mask;
        self
    }

    /// Mark bits of a register as write-one-to-clear flags
    pub fn with_write_one_to_clear(mut self, offset: usize, mask: u32) -> Self {
        self.write_one_to_clear[Self::index(offset)] |= mask;
        self
    }

    /// Change a register behind the driver's back, as hardware would
    ///
    /// Not recorded in the write history.
    pub fn poke(&self, offset: usize, value: u32) {
        self.words[Self::index(offset)].set(value);
    }

    /// Current value of a register
    pub fn peek(&self, offset: usize) -> u32 {
        self.words[Self::index(offset)].get()
    }

    /// Recorded writes, oldest first
    pub fn writes(&self) -> Vec<Access, HISTORY_LEN> {
        self.history.borrow().oldest_ordered().copied().collect()
    }

    /// Recorded writes to one register, oldest first
    pub fn writes_to(&self, offset: usize) -> Vec<Access, HISTORY_LEN> {
        self.history
            .borrow()
            .oldest_ordered()
            .filter(|access| access.offset == offset)
            .copied()
            .collect()
    }

    /// Forget all recorded writes
    pub fn clear_history(&self) {
        self.history.borrow_mut().clear();
    }

    fn index(offset: usize) -> usize {
        assert!(offset % 4 == 0, "unaligned register offset {:#x}", offset);
        let index = offset / 4;
        assert!(index < WORDS, "register offset {:#x} outside block", offset);
        index
    }
}

impl<const WORDS: usize> RegisterBus for MemoryBus<WORDS> {
    fn read(&self, offset: usize) -> u32 {
        self.words[Self::index(offset)].get()
    }

    fn write(&self, offset: usize, alias: Alias, value: u32) {
        let index = Self::index(offset);
        let current = self.words[index].get();
        let w1c = self.write_one_to_clear[index];

        let next = match alias {
            Alias::Normal => (current & w1c & !value) | (value & !w1c),
            _ => alias.apply(current, value),
        };

        self.words[index].set(next & !self.self_clearing[index]);
        self.history.borrow_mut().write(Access {
            offset,
            alias,
            value,
        });
    }
}
