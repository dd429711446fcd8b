//! Driver errors
//!
//! Every error here is a caller-contract violation found while setting a
//! PIO block up: asking for more instruction memory than is left, fixed
//! placements that collide, or a state machine that does not exist. None of
//! them is transient, so there is nothing to retry.

use core::fmt;

/// PIO driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// State machine index outside 0..=3
    InvalidStateMachine(u8),
    /// Program has no instructions
    EmptyProgram,
    /// Program is longer than the whole instruction memory
    ProgramTooLarge { len: usize },
    /// Program would run past the end of instruction memory
    OutOfRange { offset: u8, len: u8 },
    /// Fixed-origin program asked to go somewhere other than its origin
    OriginMismatch { origin: u8, offset: u8 },
    /// Some slot of the requested span is already in use
    Occupied { offset: u8, len: u8 },
    /// No free span is large enough for a relocatable program
    NoSpace { len: u8 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidStateMachine(index) => write!(f, "invalid state machine index {}", index),
            Error::EmptyProgram => write!(f, "program has no instructions"),
            Error::ProgramTooLarge { len } => {
                write!(f, "program of {} instructions does not fit in instruction memory", len)
            }
            Error::OutOfRange { offset, len } => {
                write!(f, "{} instructions at offset {} run past instruction memory", len, offset)
            }
            Error::OriginMismatch { origin, offset } => {
                write!(f, "program must be loaded at {}, not {}", origin, offset)
            }
            Error::Occupied { offset, len } => {
                write!(f, "instruction memory {}..{} already in use", offset, offset + len)
            }
            Error::NoSpace { len } => write!(f, "no free space for {} instructions", len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    #[test]
    fn test_display_names_the_span() {
        assert_eq!(
            format!("{}", Error::Occupied { offset: 5, len: 3 }),
            "instruction memory 5..8 already in use"
        );
        assert_eq!(
            format!("{}", Error::InvalidStateMachine(4)),
            "invalid state machine index 4"
        );
    }
}
