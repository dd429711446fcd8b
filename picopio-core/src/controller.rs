//! PIO block controller
//!
//! [`Pio`] owns one PIO block's instruction memory bookkeeping and writes
//! programs into the block through a [`RegisterBus`]. State machine handles
//! borrow the same bus.

use picopio_hal::RegisterBus;

use crate::error::Error;
use crate::layout;
use crate::memory::InstructionMemory;
use crate::program::Program;
use crate::state_machine::{StateMachine, NUMBER_STATE_MACHINES};

/// Which PIO block a controller drives
///
/// The block number feeds DMA request numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PioBlock {
    Pio0 = 0,
    Pio1 = 1,
}

impl PioBlock {
    /// Block number
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Controller for one PIO block
pub struct Pio<B: RegisterBus> {
    bus: B,
    block: PioBlock,
    memory: InstructionMemory,
}

impl<B: RegisterBus> Pio<B> {
    /// Take control of `block`, reached through `bus`
    ///
    /// The controller assumes the whole instruction memory is free.
    pub fn new(bus: B, block: PioBlock) -> Self {
        Self {
            bus,
            block,
            memory: InstructionMemory::new(),
        }
    }

    pub fn block(&self) -> PioBlock {
        self.block
    }

    /// Register bus of this block
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Bit n set = instruction memory slot n occupied
    pub fn used_mask(&self) -> u32 {
        self.memory.used_mask()
    }

    /// Handle to state machine `index`
    pub fn state_machine(&self, index: u8) -> Result<StateMachine<'_, B>, Error> {
        if index as usize >= NUMBER_STATE_MACHINES {
            return Err(Error::InvalidStateMachine(index));
        }
        Ok(StateMachine::new(&self.bus, self.block, index))
    }

    /// Whether `program` could be written at `offset`
    pub fn can_place_at(&self, program: &Program<'_>, offset: u8) -> bool {
        self.memory.can_place_at(program, offset)
    }

    /// Load `program` wherever it fits and return its offset
    ///
    /// Relocatable programs go to the highest free span. On failure nothing
    /// is written and no slot is claimed.
    pub fn load(&mut self, program: &Program<'_>) -> Result<u8, Error> {
        let offset = self.memory.find_offset(program).map_err(|err| {
            warn!(
                "no room for {} instructions ({} slots free, used {=u32:#x})",
                program.len(),
                self.memory.free_slots(),
                self.memory.used_mask()
            );
            err
        })?;
        self.place_at(program, offset)?;
        Ok(offset)
    }

    /// Load `program` at `offset`
    ///
    /// Claims the slots, then writes every instruction with JMP targets moved
    /// by `offset`.
    pub fn place_at(&mut self, program: &Program<'_>, offset: u8) -> Result<(), Error> {
        self.memory.claim(program, offset)?;

        for (slot, word) in (offset..).zip(program.relocated(offset)) {
            self.bus
                .reg(layout::instr_mem(slot))
                .set(u32::from(word));
        }

        debug!(
            "PIO{}: loaded {} instructions at {}",
            self.block.index(),
            program.len(),
            offset
        );
        Ok(())
    }
}
