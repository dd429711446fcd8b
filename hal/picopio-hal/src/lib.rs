//! Picopio Hardware Abstraction Layer
//!
//! This crate defines how the PIO driver reaches hardware registers, so the
//! same driver code can run against a real register block or against an
//! in-memory register file on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  picopio-core (allocator, config, SMs)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picopio-hal (this crate - RegisterBus) │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ picopio-hal-  │       │  MemoryBus    │
//! │ rp2040 (MMIO) │       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Types
//!
//! - [`register::RegisterBus`] - Read/write access to a register block
//! - [`register::Alias`] - Atomic XOR/SET/CLR address views
//! - [`register::Reg`] - Handle to one register in a block
//! - [`memory::MemoryBus`] - In-memory register file with write history

#![no_std]
#![deny(unsafe_code)]

pub mod memory;
pub mod register;

// Re-export key types at crate root for convenience
pub use memory::{Access, MemoryBus};
pub use register::{Alias, AliasReg, Reg, RegisterBus};
