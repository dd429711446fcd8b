//! Register access abstractions
//!
//! Each peripheral register block is allocated 4kB of address space per
//! access method. A register is reached through one of 4 views, selected by
//! address decode (see "Atomic Register Access" in the RP2040 datasheet):
//!
//! - `Addr + 0x0000` : normal read write access
//! - `Addr + 0x1000` : atomic XOR on write
//! - `Addr + 0x2000` : atomic bitmask set on write
//! - `Addr + 0x3000` : atomic bitmask clear on write
//!
//! Writes through the XOR/SET/CLR views are a single bus transaction, so a
//! bit can be flipped without a software read-modify-write that an interrupt
//! could split.

/// Address-decoded view of a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alias {
    /// Plain read/write access
    Normal,
    /// Atomic XOR on write
    Xor,
    /// Atomic bitmask set on write
    Set,
    /// Atomic bitmask clear on write
    Clear,
}

impl Alias {
    /// Byte offset of this view from the register's normal address
    pub const fn offset(self) -> usize {
        match self {
            Alias::Normal => 0x0000,
            Alias::Xor => 0x1000,
            Alias::Set => 0x2000,
            Alias::Clear => 0x3000,
        }
    }

    /// Register contents after `value` is written through this view
    pub const fn apply(self, current: u32, value: u32) -> u32 {
        match self {
            Alias::Normal => value,
            Alias::Xor => current ^ value,
            Alias::Set => current | value,
            Alias::Clear => current & !value,
        }
    }
}

/// Access to a block of 32-bit registers
///
/// Offsets are byte offsets of the normal (read/write) view from the start
/// of the block. Implementations decide how an [`Alias`] reaches hardware.
pub trait RegisterBus {
    /// Read the register at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write `value` to the register at `offset` through `alias`
    ///
    /// Writes through [`Alias::Xor`], [`Alias::Set`] and [`Alias::Clear`]
    /// must land as one bus transaction.
    fn write(&self, offset: usize, alias: Alias, value: u32);

    /// Handle to the register at `offset`
    fn reg(&self, offset: usize) -> Reg<'_, Self> {
        Reg::new(self, offset)
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    fn write(&self, offset: usize, alias: Alias, value: u32) {
        (**self).write(offset, alias, value)
    }
}

/// A single 32-bit register in a block
pub struct Reg<'a, B: ?Sized> {
    bus: &'a B,
    offset: usize,
}

impl<B: ?Sized> Clone for Reg<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: ?Sized> Copy for Reg<'_, B> {}

impl<'a, B: RegisterBus + ?Sized> Reg<'a, B> {
    /// Create a handle to the register at `offset` on `bus`
    pub fn new(bus: &'a B, offset: usize) -> Self {
        Self { bus, offset }
    }

    /// Byte offset of the register in its block
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Read the current value
    pub fn get(&self) -> u32 {
        self.bus.read(self.offset)
    }

    /// Overwrite the whole register
    pub fn set(&self, value: u32) {
        self.bus.write(self.offset, Alias::Normal, value)
    }

    /// View the same register through `alias`
    pub fn alias(&self, alias: Alias) -> AliasReg<'a, B> {
        AliasReg {
            bus: self.bus,
            offset: self.offset,
            alias,
        }
    }

    /// Atomically set the bits in `mask`
    pub fn set_bits(&self, mask: u32) {
        self.alias(Alias::Set).write(mask)
    }

    /// Atomically clear the bits in `mask`
    pub fn clear_bits(&self, mask: u32) {
        self.alias(Alias::Clear).write(mask)
    }

    /// Atomically toggle the bits in `mask`
    pub fn toggle_bits(&self, mask: u32) {
        self.alias(Alias::Xor).write(mask)
    }
}

/// Write-only handle to a register through one address-decoded view
pub struct AliasReg<'a, B: ?Sized> {
    bus: &'a B,
    offset: usize,
    alias: Alias,
}

impl<B: ?Sized> Clone for AliasReg<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: ?Sized> Copy for AliasReg<'_, B> {}

impl<B: RegisterBus + ?Sized> AliasReg<'_, B> {
    /// The view this handle writes through
    pub fn alias(&self) -> Alias {
        self.alias
    }

    /// Byte offset of the underlying register in its block
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Write `value` through this view
    pub fn write(&self, value: u32) {
        self.bus.write(self.offset, self.alias, value)
    }
}
