//! State machine control
//!
//! A [`StateMachine`] is a handle to one of the four execution units of a
//! PIO block. It applies configuration words, starts and stops the unit,
//! injects instructions and moves data through the FIFOs.
//!
//! Bits shared between state machines (CTRL, FDEBUG) are only ever written
//! through the atomic SET/CLR views or as write-one-to-clear masks, so a
//! handle never disturbs its siblings.

use picopio_hal::{Reg, RegisterBus};

use crate::config::StateMachineConfig;
use crate::controller::PioBlock;
use crate::instr::{self, SET_MAX_PINS};
use crate::layout::{
    self, field_mask, sm_bit, SmReg, ADDR, CTRL, CTRL_BITS, FDEBUG, FDEBUG_BITS, FSTAT,
    FSTAT_BITS, PINCTRL, SHIFTCTRL,
};

/// Number of state machines in a PIO block
pub const NUMBER_STATE_MACHINES: usize = 4;

/// DREQ numbers of one block: 4 TX then 4 RX
const DREQ_PER_BLOCK: u8 = 8;

/// Handle to one state machine
pub struct StateMachine<'a, B> {
    bus: &'a B,
    block: PioBlock,
    index: u8,
}

impl<B> Clone for StateMachine<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for StateMachine<'_, B> {}

impl<'a, B: RegisterBus> StateMachine<'a, B> {
    pub(crate) fn new(bus: &'a B, block: PioBlock, index: u8) -> Self {
        Self { bus, block, index }
    }

    /// State machine number within its block (0 to 3)
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn block(&self) -> PioBlock {
        self.block
    }

    fn reg(&self, reg: SmReg) -> Reg<'a, B> {
        Reg::new(self.bus, layout::sm_reg(self.index, reg))
    }

    fn ctrl(&self) -> Reg<'a, B> {
        Reg::new(self.bus, CTRL)
    }

    fn fstat_bit(&self, shift: usize) -> bool {
        Reg::new(self.bus, FSTAT).get() & sm_bit(shift, self.index) != 0
    }

    /// Start or halt the state machine
    pub fn set_enabled(&self, enabled: bool) {
        let bit = sm_bit(CTRL_BITS::SM_ENABLE.shift, self.index);
        if enabled {
            self.ctrl().set_bits(bit);
        } else {
            self.ctrl().clear_bits(bit);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ctrl().get() & sm_bit(CTRL_BITS::SM_ENABLE.shift, self.index) != 0
    }

    /// Clear internal state: shift counters, delay counter, pending stalls
    ///
    /// The program counter, scratch registers and FIFOs are left alone.
    pub fn restart(&self) {
        self.ctrl()
            .set_bits(sm_bit(CTRL_BITS::SM_RESTART.shift, self.index));
    }

    /// Restart the clock divider from phase 0
    pub fn clkdiv_restart(&self) {
        self.ctrl()
            .set_bits(sm_bit(CTRL_BITS::CLKDIV_RESTART.shift, self.index));
    }

    /// Write all four configuration registers
    ///
    /// Halt the state machine first.
    pub fn set_config(&self, config: &StateMachineConfig) {
        self.reg(SmReg::ClkDiv).set(config.clkdiv);
        self.reg(SmReg::ExecCtrl).set(config.execctrl);
        self.reg(SmReg::ShiftCtrl).set(config.shiftctrl);
        self.reg(SmReg::PinCtrl).set(config.pinctrl);
    }

    /// Execute `instruction` immediately
    pub fn exec(&self, instruction: u16) {
        self.reg(SmReg::Instr).set(u32::from(instruction));
    }

    /// Reset the state machine into a known state, ready to run from
    /// `initial_pc`
    ///
    /// Halts it, writes `config` (or the default configuration), empties
    /// both FIFOs, clears its FIFO debug flags, restarts it and its clock
    /// divider, then jumps to `initial_pc`. The state machine stays halted.
    pub fn init(&self, initial_pc: u8, config: Option<&StateMachineConfig>) {
        self.set_enabled(false);

        let default = StateMachineConfig::default();
        self.set_config(config.unwrap_or(&default));

        self.clear_fifos();
        self.clear_fifo_debug();

        self.restart();
        self.clkdiv_restart();
        self.exec(instr::jmp(initial_pc));

        debug!(
            "PIO{} SM{}: init at {}",
            self.block.index(),
            self.index,
            initial_pc
        );
    }

    /// Empty both FIFOs
    ///
    /// Toggling FJOIN_RX flushes the FIFOs; toggling it back restores the
    /// join mode.
    pub fn clear_fifos(&self) {
        let shiftctrl = self.reg(SmReg::ShiftCtrl);
        let fjoin_rx = field_mask(SHIFTCTRL::FJOIN_RX);
        shiftctrl.toggle_bits(fjoin_rx);
        shiftctrl.toggle_bits(fjoin_rx);
    }

    /// Clear this state machine's latched stall, overflow and underflow
    /// flags
    pub fn clear_fifo_debug(&self) {
        let mask = sm_bit(FDEBUG_BITS::TXSTALL.shift, self.index)
            | sm_bit(FDEBUG_BITS::TXOVER.shift, self.index)
            | sm_bit(FDEBUG_BITS::RXUNDER.shift, self.index)
            | sm_bit(FDEBUG_BITS::RXSTALL.shift, self.index);
        Reg::new(self.bus, FDEBUG).set(mask);
    }

    /// Set the direction of `count` consecutive pins starting at `pin`
    ///
    /// Runs `set pindirs` on the state machine, at most five pins per
    /// instruction, wrapping from pin 31 to pin 0. PINCTRL is restored
    /// afterwards. The state machine should be halted.
    pub fn set_consecutive_pindirs(&self, pin: u8, count: u8, is_out: bool) {
        let pinctrl = self.reg(SmReg::PinCtrl);
        let saved = pinctrl.get();
        let pindirs = if is_out { 0x1F } else { 0 };

        let mut pin = pin & 0x1F;
        let mut remaining = count;
        loop {
            let chunk = remaining.min(SET_MAX_PINS);
            pinctrl.set(
                (PINCTRL::SET_COUNT.val(u32::from(chunk)) + PINCTRL::SET_BASE.val(u32::from(pin)))
                    .value,
            );
            self.exec(instr::set_pindirs(pindirs));
            trace!("SM{}: pindirs {} pins from {}", self.index, chunk, pin);

            remaining -= chunk;
            if remaining == 0 {
                break;
            }
            pin = (pin + SET_MAX_PINS) & 0x1F;
        }

        pinctrl.set(saved);
    }

    pub fn is_tx_fifo_empty(&self) -> bool {
        self.fstat_bit(FSTAT_BITS::TXEMPTY.shift)
    }

    pub fn is_tx_fifo_full(&self) -> bool {
        self.fstat_bit(FSTAT_BITS::TXFULL.shift)
    }

    pub fn is_rx_fifo_empty(&self) -> bool {
        self.fstat_bit(FSTAT_BITS::RXEMPTY.shift)
    }

    /// Push a word into the TX FIFO
    ///
    /// Does not check for space; a write to a full FIFO is dropped and
    /// latches TXOVER.
    pub fn tx(&self, word: u32) {
        Reg::new(self.bus, layout::txf(self.index)).set(word);
    }

    /// Pop a word from the RX FIFO
    ///
    /// Reading an empty FIFO returns garbage and latches RXUNDER.
    pub fn rx(&self) -> u32 {
        Reg::new(self.bus, layout::rxf(self.index)).get()
    }

    /// Address of the instruction being executed
    pub fn pc(&self) -> u8 {
        (self.reg(SmReg::Addr).get() & field_mask(ADDR::ADDR)) as u8
    }

    /// DMA request number paced by the TX FIFO
    pub fn tx_dreq(&self) -> u8 {
        self.block.index() * DREQ_PER_BLOCK + self.index
    }

    /// DMA request number paced by the RX FIFO
    pub fn rx_dreq(&self) -> u8 {
        self.block.index() * DREQ_PER_BLOCK + NUMBER_STATE_MACHINES as u8 + self.index
    }
}
