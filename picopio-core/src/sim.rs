//! Simulated PIO register block for unit tests

use core::ops::Deref;

use picopio_hal::{Alias, MemoryBus, RegisterBus};

use crate::layout::{
    self, field_mask, sm_bit, SmReg, CTRL, CTRL_BITS, FDEBUG, FSTAT, FSTAT_BITS, FSTAT_RESET,
    SHIFTCTRL,
};
use crate::state_machine::NUMBER_STATE_MACHINES;

const EXECCTRL_RESET: u32 = 0x0001_F000;
const SHIFTCTRL_RESET: u32 = 0x000C_0000;

/// PIO register file with the FIFO side effects the driver relies on
///
/// A TX FIFO write makes that FIFO non-empty. Any SHIFTCTRL write that
/// flips FJOIN_TX or FJOIN_RX flushes both FIFOs of that state machine.
pub(crate) struct SimBus {
    regs: MemoryBus<{ layout::BLOCK_WORDS }>,
}

impl SimBus {
    fn update_fstat(&self, set: u32, clear: u32) {
        self.regs.poke(FSTAT, (self.regs.peek(FSTAT) | set) & !clear);
    }

    fn push_tx(&self, index: u8) {
        self.update_fstat(0, sm_bit(FSTAT_BITS::TXEMPTY.shift, index));
    }

    fn flush(&self, index: u8) {
        let empty = sm_bit(FSTAT_BITS::TXEMPTY.shift, index)
            | sm_bit(FSTAT_BITS::RXEMPTY.shift, index);
        let full =
            sm_bit(FSTAT_BITS::TXFULL.shift, index) | sm_bit(FSTAT_BITS::RXFULL.shift, index);
        self.update_fstat(empty, full);
    }
}

impl Deref for SimBus {
    type Target = MemoryBus<{ layout::BLOCK_WORDS }>;

    fn deref(&self) -> &Self::Target {
        &self.regs
    }
}

impl RegisterBus for SimBus {
    fn read(&self, offset: usize) -> u32 {
        self.regs.read(offset)
    }

    fn write(&self, offset: usize, alias: Alias, value: u32) {
        let before = self.regs.peek(offset);
        self.regs.write(offset, alias, value);
        let after = self.regs.peek(offset);

        let fjoin = field_mask(SHIFTCTRL::FJOIN_TX) | field_mask(SHIFTCTRL::FJOIN_RX);
        for index in 0..NUMBER_STATE_MACHINES as u8 {
            if offset == layout::txf(index) {
                self.push_tx(index);
            }
            if offset == layout::sm_reg(index, SmReg::ShiftCtrl) && (before ^ after) & fjoin != 0 {
                self.flush(index);
            }
        }
    }
}

/// A PIO block straight out of reset
///
/// FIFOs read empty, the CTRL restart strobes never stick and FDEBUG flags
/// are write-one-to-clear.
pub(crate) fn pio_bus() -> SimBus {
    let strobes = field_mask(CTRL_BITS::SM_RESTART) | field_mask(CTRL_BITS::CLKDIV_RESTART);

    let regs = MemoryBus::new()
        .with_reset_value(FSTAT, FSTAT_RESET)
        .with_self_clearing(CTRL, strobes)
        .with_write_one_to_clear(FDEBUG, 0x0F0F_0F0F);

    let regs = (0..NUMBER_STATE_MACHINES as u8).fold(regs, |regs, index| {
        regs.with_reset_value(layout::sm_reg(index, SmReg::ExecCtrl), EXECCTRL_RESET)
            .with_reset_value(layout::sm_reg(index, SmReg::ShiftCtrl), SHIFTCTRL_RESET)
    });

    SimBus { regs }
}
