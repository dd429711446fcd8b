//! Memory-mapped register bus
//!
//! Each RP2040 peripheral occupies 16kB of address space: the register
//! block itself followed by its XOR, SET and CLR views at 4kB steps. The
//! bus fabric performs the atomic update, so every write here is a single
//! volatile store.

use picopio_core::{Pio, PioBlock};
use picopio_hal::{Alias, RegisterBus};

/// Base address of PIO0
pub const PIO0_BASE: usize = 0x5020_0000;

/// Base address of PIO1
pub const PIO1_BASE: usize = 0x5030_0000;

/// Register block reached through volatile loads and stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MmioBus {
    base: usize,
}

impl MmioBus {
    /// Bus over the register block at `base`
    ///
    /// # Safety
    ///
    /// `base` must be the address of a peripheral register block with the
    /// standard RP2040 alias layout, and nothing else may drive that block
    /// while the bus is in use.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub const fn base(&self) -> usize {
        self.base
    }

    /// Address of the register at `offset` as seen through `alias`
    pub const fn address(&self, offset: usize, alias: Alias) -> usize {
        self.base + alias.offset() + offset
    }
}

impl RegisterBus for MmioBus {
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: the constructor's contract makes every offset inside the
        // block a valid, aligned register address.
        unsafe { core::ptr::read_volatile(self.address(offset, Alias::Normal) as *const u32) }
    }

    fn write(&self, offset: usize, alias: Alias, value: u32) {
        // SAFETY: as for `read`; the alias views are part of the same
        // peripheral window.
        unsafe { core::ptr::write_volatile(self.address(offset, alias) as *mut u32, value) }
    }
}

/// Controller for PIO0
///
/// # Safety
///
/// Only one controller (or other driver) may own PIO0 at a time, and the
/// block must be out of reset.
pub unsafe fn pio0() -> Pio<MmioBus> {
    Pio::new(MmioBus::new(PIO0_BASE), PioBlock::Pio0)
}

/// Controller for PIO1
///
/// # Safety
///
/// Only one controller (or other driver) may own PIO1 at a time, and the
/// block must be out of reset.
pub unsafe fn pio1() -> Pio<MmioBus> {
    Pio::new(MmioBus::new(PIO1_BASE), PioBlock::Pio1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use picopio_core::layout;

    #[test]
    fn test_alias_addresses() {
        let bus = unsafe { MmioBus::new(PIO0_BASE) };
        assert_eq!(bus.address(layout::CTRL, Alias::Normal), 0x5020_0000);
        assert_eq!(bus.address(layout::CTRL, Alias::Xor), 0x5020_1000);
        assert_eq!(bus.address(layout::CTRL, Alias::Set), 0x5020_2000);
        assert_eq!(bus.address(layout::CTRL, Alias::Clear), 0x5020_3000);
        assert_eq!(bus.address(layout::instr_mem(31), Alias::Normal), 0x5020_00C4);
    }

    #[test]
    fn test_controllers_match_blocks() {
        let pio = unsafe { pio1() };
        assert_eq!(pio.block(), PioBlock::Pio1);
        assert_eq!(pio.bus().base(), PIO1_BASE);
        assert_eq!(pio.used_mask(), 0);
    }
}
