//! Board-agnostic PIO driver logic
//!
//! This crate contains everything about driving a PIO block that does not
//! depend on how its registers are reached:
//!
//! - Instruction memory allocation with jump relocation
//! - State machine configuration word packing
//! - State machine control (enable, restart, immediate execution, FIFOs)
//! - The RP2040 register layout contract
//!
//! Registers are accessed through [`picopio_hal::RegisterBus`], so the same
//! code drives real hardware or an in-memory register file in tests.
//!
//! # Usage
//!
//! ```ignore
//! let mut pio = Pio::new(bus, PioBlock::Pio0);
//! let offset = pio.load(&program)?;
//!
//! let mut config = StateMachineConfig::default();
//! config.set_wrap(offset, offset + 1);
//!
//! let sm = pio.state_machine(0)?;
//! sm.init(offset, Some(&config));
//! sm.set_enabled(true);
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

// This must go first so the logging macros are visible to the other modules
#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod error;
pub mod instr;
pub mod layout;
pub mod memory;
pub mod program;
pub mod state_machine;

#[cfg(test)]
mod sim;

pub use config::{clock_divider, FifoJoin, MovStatus, StateMachineConfig};
pub use controller::{Pio, PioBlock};
pub use error::Error;
pub use memory::{InstructionMemory, INSTRUCTION_MEMORY_SIZE};
pub use program::{Origin, Program};
pub use state_machine::{StateMachine, NUMBER_STATE_MACHINES};
