//! RP2040 register access for the picopio PIO driver
//!
//! This crate provides the RP2040 implementation of the shared
//! `picopio-hal` traits:
//!
//! - Memory-mapped [`MmioBus`] reaching registers and their atomic
//!   XOR/SET/CLR views
//! - Constructors for controllers of the two PIO blocks
//!
//! Everything else (allocation, configuration, state machine control) lives
//! in `picopio-core` and is shared with host tests.

#![no_std]

pub mod mmio;

pub use mmio::{pio0, pio1, MmioBus, PIO0_BASE, PIO1_BASE};

// Re-export the driver for convenience
pub use picopio_core::{Error, Pio, PioBlock, Program, StateMachine, StateMachineConfig};
