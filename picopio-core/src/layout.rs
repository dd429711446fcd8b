//! PIO register block layout
//!
//! Byte offsets and bit-fields of the RP2040 PIO register block (datasheet
//! section 3.7). Generated program tables and their default configuration
//! helpers depend on these words staying exactly as laid out here.

use tock_registers::fields::Field;
use tock_registers::{register_bitfields, RegisterLongName};

/// PIO control register
pub const CTRL: usize = 0x000;
/// FIFO status register
pub const FSTAT: usize = 0x004;
/// FIFO debug register
pub const FDEBUG: usize = 0x008;
/// FIFO levels
pub const FLEVEL: usize = 0x00C;
/// TX FIFO of state machine 0
pub const TXF0: usize = 0x010;
/// RX FIFO of state machine 0
pub const RXF0: usize = 0x020;
/// Distance between successive TX (and RX) FIFO registers
pub const FIFO_STRIDE: usize = 0x4;
/// Instruction memory slot 0
pub const INSTR_MEM0: usize = 0x048;
/// Distance between instruction memory slots
pub const INSTR_MEM_STRIDE: usize = 0x4;
/// First register of state machine 0
pub const SM0_BASE: usize = 0x0C8;
/// Distance between successive state machine register blocks
pub const SM_STRIDE: usize = 0x18;
/// Size of the register block in bytes
pub const BLOCK_SIZE: usize = 0x144;
/// Size of the register block in 32-bit words
pub const BLOCK_WORDS: usize = BLOCK_SIZE / 4;

/// Reset value of FSTAT: every FIFO empty
pub const FSTAT_RESET: u32 = 0x0F00_0F00;

/// Registers inside one state machine's block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum SmReg {
    /// Clock divisor
    ClkDiv = 0x00,
    /// Execution/behavioural settings
    ExecCtrl = 0x04,
    /// Shift register and FIFO control
    ShiftCtrl = 0x08,
    /// Current instruction address
    Addr = 0x0C,
    /// Write to execute an instruction immediately
    Instr = 0x10,
    /// Pin mapping
    PinCtrl = 0x14,
}

/// Byte offset of `reg` for state machine `index`
pub const fn sm_reg(index: u8, reg: SmReg) -> usize {
    SM0_BASE + index as usize * SM_STRIDE + reg as usize
}

/// Byte offset of the TX FIFO register for state machine `index`
pub const fn txf(index: u8) -> usize {
    TXF0 + index as usize * FIFO_STRIDE
}

/// Byte offset of the RX FIFO register for state machine `index`
pub const fn rxf(index: u8) -> usize {
    RXF0 + index as usize * FIFO_STRIDE
}

/// Byte offset of instruction memory slot `slot`
pub const fn instr_mem(slot: u8) -> usize {
    INSTR_MEM0 + slot as usize * INSTR_MEM_STRIDE
}

register_bitfields![u32,
pub CTRL_BITS [
    /// Restart a state machine's clock divider from an initial phase of 0
    CLKDIV_RESTART OFFSET(8) NUMBITS(4) [],
    /// Clear internal state machine state (shift counters, delay, stalls)
    SM_RESTART OFFSET(4) NUMBITS(4) [],
    /// Run/halt each state machine
    SM_ENABLE OFFSET(0) NUMBITS(4) []
],
pub FSTAT_BITS [
    TXEMPTY OFFSET(24) NUMBITS(4) [],
    TXFULL OFFSET(16) NUMBITS(4) [],
    RXEMPTY OFFSET(8) NUMBITS(4) [],
    RXFULL OFFSET(0) NUMBITS(4) []
],
pub FDEBUG_BITS [
    /// Stalled on empty TX FIFO. Write 1 to clear.
    TXSTALL OFFSET(24) NUMBITS(4) [],
    /// TX FIFO overflow. Write 1 to clear.
    TXOVER OFFSET(16) NUMBITS(4) [],
    /// RX FIFO underflow. Write 1 to clear.
    RXUNDER OFFSET(8) NUMBITS(4) [],
    /// Stalled on full RX FIFO. Write 1 to clear.
    RXSTALL OFFSET(0) NUMBITS(4) []
],
pub CLKDIV [
    /// Effective frequency is sysclk/(int + frac/256).
    /// Value of 0 is interpreted as 65536.
    INT OFFSET(16) NUMBITS(16) [],
    FRAC OFFSET(8) NUMBITS(8) []
],
pub EXECCTRL [
    EXEC_STALLED OFFSET(31) NUMBITS(1) [],
    /// MSB of the delay/side-set field is a side-set enable
    SIDE_EN OFFSET(30) NUMBITS(1) [],
    /// Side-set drives pin directions instead of values
    SIDE_PINDIR OFFSET(29) NUMBITS(1) [],
    JMP_PIN OFFSET(24) NUMBITS(5) [],
    OUT_EN_SEL OFFSET(19) NUMBITS(5) [],
    INLINE_OUT_EN OFFSET(18) NUMBITS(1) [],
    OUT_STICKY OFFSET(17) NUMBITS(1) [],
    /// After reaching this address, execution is wrapped to WRAP_BOTTOM
    WRAP_TOP OFFSET(12) NUMBITS(5) [],
    WRAP_BOTTOM OFFSET(7) NUMBITS(5) [],
    STATUS_SEL OFFSET(4) NUMBITS(1) [],
    STATUS_N OFFSET(0) NUMBITS(4) []
],
pub SHIFTCTRL [
    /// RX FIFO steals the TX FIFO's storage. FIFOs are flushed when
    /// this bit changes.
    FJOIN_RX OFFSET(31) NUMBITS(1) [],
    /// TX FIFO steals the RX FIFO's storage
    FJOIN_TX OFFSET(30) NUMBITS(1) [],
    /// Write 0 for a threshold of 32
    PULL_THRESH OFFSET(25) NUMBITS(5) [],
    /// Write 0 for a threshold of 32
    PUSH_THRESH OFFSET(20) NUMBITS(5) [],
    OUT_SHIFTDIR OFFSET(19) NUMBITS(1) [],
    IN_SHIFTDIR OFFSET(18) NUMBITS(1) [],
    AUTOPULL OFFSET(17) NUMBITS(1) [],
    AUTOPUSH OFFSET(16) NUMBITS(1) []
],
pub ADDR [
    ADDR OFFSET(0) NUMBITS(5) []
],
pub PINCTRL [
    /// Side-set bits, inclusive of the enable bit
    SIDESET_COUNT OFFSET(29) NUMBITS(3) [],
    /// Pins asserted by SET, 0 to 5
    SET_COUNT OFFSET(26) NUMBITS(3) [],
    /// Pins asserted by OUT PINS/PINDIRS and MOV PINS, 0 to 32
    OUT_COUNT OFFSET(20) NUMBITS(6) [],
    IN_BASE OFFSET(15) NUMBITS(5) [],
    SIDESET_BASE OFFSET(10) NUMBITS(5) [],
    SET_BASE OFFSET(5) NUMBITS(5) [],
    OUT_BASE OFFSET(0) NUMBITS(5) []
]
];

/// Bit for state machine `index` within a 4-bit per-SM field at `shift`
pub const fn sm_bit(shift: usize, index: u8) -> u32 {
    1 << (shift + index as usize)
}

/// Every bit `field` covers, in place
pub fn field_mask<R: RegisterLongName>(field: Field<u32, R>) -> u32 {
    field.mask << field.shift
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Panics if two fields of the same word share a bit
    fn assert_disjoint(masks: &[u32]) {
        let mut seen = 0u32;
        for mask in masks {
            assert_eq!(seen & mask, 0, "field {:#010x} overlaps {:#010x}", mask, seen);
            seen |= mask;
        }
    }

    #[test]
    fn test_sm_register_offsets() {
        assert_eq!(sm_reg(0, SmReg::ClkDiv), 0x0C8);
        assert_eq!(sm_reg(0, SmReg::PinCtrl), 0x0DC);
        assert_eq!(sm_reg(1, SmReg::ClkDiv), 0x0E0);
        assert_eq!(sm_reg(3, SmReg::Instr), 0x0C8 + 3 * 0x18 + 0x10);
        // Last state machine register ends where the interrupt block begins
        assert_eq!(sm_reg(3, SmReg::PinCtrl) + 4, 0x128);
    }

    #[test]
    fn test_fifo_and_instruction_offsets() {
        assert_eq!(txf(0), 0x010);
        assert_eq!(txf(3), 0x01C);
        assert_eq!(rxf(2), 0x028);
        assert_eq!(instr_mem(0), 0x048);
        assert_eq!(instr_mem(31), 0x0C4);
        assert_eq!(instr_mem(31) + 4, SM0_BASE);
    }

    #[test]
    fn test_execctrl_fields_disjoint() {
        assert_disjoint(&[
            field_mask(EXECCTRL::EXEC_STALLED),
            field_mask(EXECCTRL::SIDE_EN),
            field_mask(EXECCTRL::SIDE_PINDIR),
            field_mask(EXECCTRL::JMP_PIN),
            field_mask(EXECCTRL::OUT_EN_SEL),
            field_mask(EXECCTRL::INLINE_OUT_EN),
            field_mask(EXECCTRL::OUT_STICKY),
            field_mask(EXECCTRL::WRAP_TOP),
            field_mask(EXECCTRL::WRAP_BOTTOM),
            field_mask(EXECCTRL::STATUS_SEL),
            field_mask(EXECCTRL::STATUS_N),
        ]);
    }

    #[test]
    fn test_shiftctrl_fields_disjoint() {
        assert_disjoint(&[
            field_mask(SHIFTCTRL::FJOIN_RX),
            field_mask(SHIFTCTRL::FJOIN_TX),
            field_mask(SHIFTCTRL::PULL_THRESH),
            field_mask(SHIFTCTRL::PUSH_THRESH),
            field_mask(SHIFTCTRL::OUT_SHIFTDIR),
            field_mask(SHIFTCTRL::IN_SHIFTDIR),
            field_mask(SHIFTCTRL::AUTOPULL),
            field_mask(SHIFTCTRL::AUTOPUSH),
        ]);
    }

    #[test]
    fn test_pinctrl_fields_disjoint() {
        assert_disjoint(&[
            field_mask(PINCTRL::SIDESET_COUNT),
            field_mask(PINCTRL::SET_COUNT),
            field_mask(PINCTRL::OUT_COUNT),
            field_mask(PINCTRL::IN_BASE),
            field_mask(PINCTRL::SIDESET_BASE),
            field_mask(PINCTRL::SET_BASE),
            field_mask(PINCTRL::OUT_BASE),
        ]);
    }

    #[test]
    fn test_clkdiv_and_ctrl_fields_disjoint() {
        assert_disjoint(&[field_mask(CLKDIV::INT), field_mask(CLKDIV::FRAC)]);
        assert_disjoint(&[
            field_mask(CTRL_BITS::CLKDIV_RESTART),
            field_mask(CTRL_BITS::SM_RESTART),
            field_mask(CTRL_BITS::SM_ENABLE),
        ]);
        assert_disjoint(&[
            field_mask(FDEBUG_BITS::TXSTALL),
            field_mask(FDEBUG_BITS::TXOVER),
            field_mask(FDEBUG_BITS::RXUNDER),
            field_mask(FDEBUG_BITS::RXSTALL),
        ]);
    }

    #[test]
    fn test_sm_bit() {
        assert_eq!(sm_bit(CTRL_BITS::SM_ENABLE.shift, 2), 1 << 2);
        assert_eq!(sm_bit(CTRL_BITS::SM_RESTART.shift, 1), 1 << 5);
        assert_eq!(sm_bit(FSTAT_BITS::TXEMPTY.shift, 3), 1 << 27);
    }
}
