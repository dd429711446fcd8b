//! Program descriptors
//!
//! A [`Program`] is what an offline assembler hands the driver: instruction
//! words laid out as if loaded at address 0, plus where they must live.

use crate::instr;

/// Where a program has to be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Origin {
    /// Position independent; any free span will do
    Relocatable,
    /// Must be loaded exactly at this offset
    Fixed(u8),
}

impl Origin {
    /// Decode the signed origin used by generated program tables
    ///
    /// Negative values mean relocatable.
    pub const fn from_raw(raw: i8) -> Self {
        if raw < 0 {
            Origin::Relocatable
        } else {
            Origin::Fixed(raw as u8)
        }
    }

    /// Required offset, if any
    pub const fn offset(self) -> Option<u8> {
        match self {
            Origin::Relocatable => None,
            Origin::Fixed(offset) => Some(offset),
        }
    }
}

impl From<Option<u8>> for Origin {
    fn from(origin: Option<u8>) -> Self {
        match origin {
            Some(offset) => Origin::Fixed(offset),
            None => Origin::Relocatable,
        }
    }
}

/// Assembled PIO program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Program<'a> {
    /// Instruction words, addressed from 0
    pub instructions: &'a [u16],
    /// Placement requirement
    pub origin: Origin,
}

impl<'a> Program<'a> {
    /// A program that can be loaded anywhere
    pub const fn relocatable(instructions: &'a [u16]) -> Self {
        Self {
            instructions,
            origin: Origin::Relocatable,
        }
    }

    /// A program that must be loaded at `origin`
    pub const fn fixed(instructions: &'a [u16], origin: u8) -> Self {
        Self {
            instructions,
            origin: Origin::Fixed(origin),
        }
    }

    /// Number of instruction words
    pub const fn len(&self) -> usize {
        self.instructions.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction words as they must be stored when loaded at `offset`
    pub fn relocated(&self, offset: u8) -> impl Iterator<Item = u16> + 'a {
        let instructions: &'a [u16] = self.instructions;
        instructions
            .iter()
            .map(move |&word| instr::relocate(word, offset))
    }
}

impl<'a, const N: usize> From<&'a pio::Program<N>> for Program<'a> {
    fn from(program: &'a pio::Program<N>) -> Self {
        Self {
            instructions: program.code.as_slice(),
            origin: program.origin.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_from_raw() {
        assert_eq!(Origin::from_raw(-1), Origin::Relocatable);
        assert_eq!(Origin::from_raw(i8::MIN), Origin::Relocatable);
        assert_eq!(Origin::from_raw(0), Origin::Fixed(0));
        assert_eq!(Origin::from_raw(12), Origin::Fixed(12));
        assert_eq!(Origin::Fixed(12).offset(), Some(12));
        assert_eq!(Origin::Relocatable.offset(), None);
    }

    #[test]
    fn test_relocated_words() {
        // jmp 1 / out pins, 8 / jmp 0
        let code = [0x0001, 0x6008, 0x0000];
        let program = Program::relocatable(&code);

        let mut words = program.relocated(20);
        assert_eq!(words.next(), Some(0x0015));
        assert_eq!(words.next(), Some(0x6008));
        assert_eq!(words.next(), Some(0x0014));
        assert_eq!(words.next(), None);
    }

    #[test]
    fn test_from_assembled_program() {
        let assembled = pio::pio_asm!(
            "start:",
            "    pull block",
            "    out pins, 1",
            "    jmp start",
        );
        let program = Program::from(&assembled.program);

        assert_eq!(program.len(), 3);
        assert_eq!(program.origin, Origin::Relocatable);
        assert_eq!(program.instructions[2], 0x0000);
    }
}
