//! Instruction memory allocation
//!
//! All state machines of a PIO block fetch from one 32-slot instruction
//! memory. [`InstructionMemory`] tracks which slots are taken with one bit
//! per slot and decides where programs go:
//!
//! - fixed-origin programs go exactly at their origin or nowhere
//! - relocatable programs take the highest free span that fits, leaving low
//!   addresses to fixed-origin code
//!
//! Slots are only ever claimed; there is no unloading.

use crate::error::Error;
use crate::program::{Origin, Program};

/// Number of instruction memory slots in a PIO block
pub const INSTRUCTION_MEMORY_SIZE: usize = 32;

/// Occupancy of a PIO block's instruction memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InstructionMemory {
    /// Bit n set = slot n occupied
    used: u32,
}

/// Bits covering `len` slots starting at `offset`, if they fit
fn span_mask(offset: usize, len: usize) -> Option<u32> {
    if len == 0 || offset + len > INSTRUCTION_MEMORY_SIZE {
        return None;
    }
    let mask = if len == INSTRUCTION_MEMORY_SIZE {
        u32::MAX
    } else {
        (1u32 << len) - 1
    };
    Some(mask << offset)
}

/// Length of `program` in slots, if it could ever fit
fn program_len(program: &Program<'_>) -> Result<u8, Error> {
    match program.len() {
        0 => Err(Error::EmptyProgram),
        len if len > INSTRUCTION_MEMORY_SIZE => Err(Error::ProgramTooLarge { len }),
        len => Ok(len as u8),
    }
}

impl InstructionMemory {
    /// Empty instruction memory
    pub const fn new() -> Self {
        Self { used: 0 }
    }

    /// Bit n set = slot n occupied
    pub const fn used_mask(&self) -> u32 {
        self.used
    }

    /// Number of free slots
    pub const fn free_slots(&self) -> u32 {
        self.used.count_zeros()
    }

    /// Bits `program` would occupy at `offset`, or why it cannot go there
    fn check(&self, program: &Program<'_>, offset: u8) -> Result<u32, Error> {
        let len = program_len(program)?;

        if let Origin::Fixed(origin) = program.origin {
            if origin != offset {
                return Err(Error::OriginMismatch { origin, offset });
            }
        }

        let mask =
            span_mask(offset as usize, len as usize).ok_or(Error::OutOfRange { offset, len })?;
        if self.used & mask != 0 {
            return Err(Error::Occupied { offset, len });
        }
        Ok(mask)
    }

    /// Whether `program` can be placed at `offset`
    pub fn can_place_at(&self, program: &Program<'_>, offset: u8) -> bool {
        self.check(program, offset).is_ok()
    }

    /// Choose where `program` goes without claiming anything
    ///
    /// Fixed-origin programs are only tried at their origin. Relocatable
    /// programs are tried from `32 - len` down to 0 and the first free span
    /// wins.
    pub fn find_offset(&self, program: &Program<'_>) -> Result<u8, Error> {
        let len = program_len(program)?;

        match program.origin {
            Origin::Fixed(origin) => self.check(program, origin).map(|_| origin),
            Origin::Relocatable => (0..=(INSTRUCTION_MEMORY_SIZE - len as usize) as u8)
                .rev()
                .find(|&offset| self.check(program, offset).is_ok())
                .ok_or(Error::NoSpace { len }),
        }
    }

    /// Mark the slots `program` occupies at `offset` as used
    pub fn claim(&mut self, program: &Program<'_>, offset: u8) -> Result<(), Error> {
        let mask = self.check(program, offset)?;
        self.used |= mask;
        Ok(())
    }
}
