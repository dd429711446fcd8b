//! State machine configuration
//!
//! A state machine is configured by four registers: CLKDIV, EXECCTRL,
//! SHIFTCTRL and PINCTRL. [`StateMachineConfig`] holds those four words and
//! packs logical settings into them. Every setter rewrites only the
//! bit-fields it owns, so settings made earlier on the same word survive.
//!
//! The word layout is the hardware's, which lets configuration helpers
//! generated alongside assembled programs build on [`StateMachineConfig::default`].

use fixed::types::U24F8;
use tock_registers::fields::{Field, FieldValue};
use tock_registers::{LocalRegisterCopy, RegisterLongName};

use crate::layout::{CLKDIV, EXECCTRL, PINCTRL, SHIFTCTRL};
use crate::memory::INSTRUCTION_MEMORY_SIZE;

/// Smallest usable clock divider (1.0, full speed)
const CLKDIV_MIN_BITS: u32 = 1 << 8;

/// Largest clock divider the 16.8 register can hold
const CLKDIV_MAX_BITS: u32 = 0x00FF_FFFF;

/// FIFO join mode
///
/// Joining gives one direction both FIFOs' storage and disables the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoJoin {
    /// Separate TX and RX FIFOs
    #[default]
    None,
    /// TX FIFO takes the RX FIFO's storage
    Tx,
    /// RX FIFO takes the TX FIFO's storage
    Rx,
}

/// Comparison used by `mov x, status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MovStatus {
    /// All ones while the TX FIFO level is below N
    TxLessThan,
    /// All ones while the RX FIFO level is below N
    RxLessThan,
}

/// Packed configuration words for one state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateMachineConfig {
    /// SMx_CLKDIV
    pub clkdiv: u32,
    /// SMx_EXECCTRL
    pub execctrl: u32,
    /// SMx_SHIFTCTRL
    pub shiftctrl: u32,
    /// SMx_PINCTRL
    pub pinctrl: u32,
}

/// Rewrite the fields named in `value`, keeping the rest of `word`
fn update<R: RegisterLongName>(word: &mut u32, value: FieldValue<u32, R>) {
    let mut reg = LocalRegisterCopy::<u32, R>::new(*word);
    reg.modify(value);
    *word = reg.get();
}

fn read<R: RegisterLongName>(word: u32, field: Field<u32, R>) -> u32 {
    LocalRegisterCopy::<u32, R>::new(word).read(field)
}

/// Clock divider that runs a state machine at `target_hz` from `sys_clk_hz`
///
/// The result is clamped to what the divider can express: never faster
/// than the system clock, never slower than sysclk / 65536. A target of 0
/// gives the slowest divider.
pub fn clock_divider(sys_clk_hz: u32, target_hz: u32) -> U24F8 {
    if target_hz == 0 {
        return U24F8::from_bits(CLKDIV_MAX_BITS);
    }
    // 8 fractional bits: scale by 256 before dividing
    let divider_x256 = (u64::from(sys_clk_hz) << 8) / u64::from(target_hz);
    let clamped = divider_x256.clamp(u64::from(CLKDIV_MIN_BITS), u64::from(CLKDIV_MAX_BITS));
    U24F8::from_bits(clamped as u32)
}

impl Default for StateMachineConfig {
    /// Full speed, wrapping over the whole instruction memory, both shift
    /// registers shifting right with auto push/pull off and a threshold
    /// of 32. Pins are left unmapped.
    fn default() -> Self {
        let mut config = Self {
            clkdiv: 0,
            execctrl: 0,
            shiftctrl: 0,
            pinctrl: 0,
        };
        config.set_clkdiv_int_frac(1, 0);
        config.set_wrap(0, (INSTRUCTION_MEMORY_SIZE - 1) as u8);
        config.set_in_shift(true, false, 32);
        config.set_out_shift(true, false, 32);
        config
    }
}

impl StateMachineConfig {
    /// Default configuration for an assembled program loaded at `offset`
    ///
    /// Takes the program's wrap range (moved by `offset`) and side-set
    /// setup; everything else is [`StateMachineConfig::default`].
    pub fn for_program<const N: usize>(program: &pio::Program<N>, offset: u8) -> Self {
        let mut config = Self::default();
        config.set_wrap(
            offset.wrapping_add(program.wrap.target),
            offset.wrapping_add(program.wrap.source),
        );
        config.set_side_set(
            program.side_set.bits(),
            program.side_set.optional(),
            program.side_set.pindirs(),
        );
        config
    }

    /// Set the clock divider from integer and fractional (1/256) parts
    ///
    /// State machine clock = sysclk / (int + frac / 256). `(1, 0)` runs at
    /// full speed.
    pub fn set_clkdiv_int_frac(&mut self, int: u16, frac: u8) {
        update(
            &mut self.clkdiv,
            CLKDIV::INT.val(u32::from(int)) + CLKDIV::FRAC.val(u32::from(frac)),
        );
    }

    /// Set the clock divider from a 16.8 fixed-point value
    pub fn set_clock_divider(&mut self, divider: U24F8) {
        let bits = divider.to_bits();
        let int = (bits >> 8).min(0xFFFF) as u16;
        let frac = (bits & 0xFF) as u8;
        self.set_clkdiv_int_frac(int, frac);
    }

    /// Integer and fractional parts of the clock divider
    pub fn clkdiv_int_frac(&self) -> (u16, u8) {
        (
            read(self.clkdiv, CLKDIV::INT) as u16,
            read(self.clkdiv, CLKDIV::FRAC) as u8,
        )
    }

    /// Set the wrap range
    ///
    /// After executing the instruction at `top` the program counter goes to
    /// `target` (unless that instruction jumped).
    pub fn set_wrap(&mut self, target: u8, top: u8) {
        update(
            &mut self.execctrl,
            EXECCTRL::WRAP_BOTTOM.val(u32::from(target)) + EXECCTRL::WRAP_TOP.val(u32::from(top)),
        );
    }

    /// Wrap range as `(target, top)`
    pub fn wrap(&self) -> (u8, u8) {
        (
            read(self.execctrl, EXECCTRL::WRAP_BOTTOM) as u8,
            read(self.execctrl, EXECCTRL::WRAP_TOP) as u8,
        )
    }

    /// Configure the input shift register
    ///
    /// `threshold` is stored in a 5-bit field; 32 is written as 0.
    pub fn set_in_shift(&mut self, shift_right: bool, autopush: bool, threshold: u8) {
        update(
            &mut self.shiftctrl,
            SHIFTCTRL::IN_SHIFTDIR.val(u32::from(shift_right))
                + SHIFTCTRL::AUTOPUSH.val(u32::from(autopush))
                + SHIFTCTRL::PUSH_THRESH.val(u32::from(threshold)),
        );
    }

    /// Configure the output shift register
    ///
    /// `threshold` is stored in a 5-bit field; 32 is written as 0.
    pub fn set_out_shift(&mut self, shift_right: bool, autopull: bool, threshold: u8) {
        update(
            &mut self.shiftctrl,
            SHIFTCTRL::OUT_SHIFTDIR.val(u32::from(shift_right))
                + SHIFTCTRL::AUTOPULL.val(u32::from(autopull))
                + SHIFTCTRL::PULL_THRESH.val(u32::from(threshold)),
        );
    }

    /// Join the FIFOs, or split them again
    pub fn set_fifo_join(&mut self, join: FifoJoin) {
        update(
            &mut self.shiftctrl,
            SHIFTCTRL::FJOIN_TX.val(u32::from(join == FifoJoin::Tx))
                + SHIFTCTRL::FJOIN_RX.val(u32::from(join == FifoJoin::Rx)),
        );
    }

    /// Configure side-set
    ///
    /// `bit_count` includes the enable bit when `optional` is set.
    /// With `pindirs` side-set drives pin directions instead of values.
    pub fn set_side_set(&mut self, bit_count: u8, optional: bool, pindirs: bool) {
        update(&mut self.pinctrl, PINCTRL::SIDESET_COUNT.val(u32::from(bit_count)));
        update(
            &mut self.execctrl,
            EXECCTRL::SIDE_EN.val(u32::from(optional))
                + EXECCTRL::SIDE_PINDIR.val(u32::from(pindirs)),
        );
    }

    /// Lowest pin driven by side-set
    pub fn set_side_set_pins(&mut self, base: u8) {
        update(&mut self.pinctrl, PINCTRL::SIDESET_BASE.val(u32::from(base)));
    }

    /// Pins written by `set pins` / `set pindirs`
    ///
    /// `count` is at most 5.
    pub fn set_set_pins(&mut self, base: u8, count: u8) {
        update(
            &mut self.pinctrl,
            PINCTRL::SET_BASE.val(u32::from(base)) + PINCTRL::SET_COUNT.val(u32::from(count)),
        );
    }

    /// Pins written by `out pins` / `out pindirs` / `mov pins`
    pub fn set_out_pins(&mut self, base: u8, count: u8) {
        update(
            &mut self.pinctrl,
            PINCTRL::OUT_BASE.val(u32::from(base)) + PINCTRL::OUT_COUNT.val(u32::from(count)),
        );
    }

    /// Pin mapped to bit 0 of `in pins`
    pub fn set_in_pins(&mut self, base: u8) {
        update(&mut self.pinctrl, PINCTRL::IN_BASE.val(u32::from(base)));
    }

    /// Pin tested by `jmp pin`
    pub fn set_jmp_pin(&mut self, pin: u8) {
        update(&mut self.execctrl, EXECCTRL::JMP_PIN.val(u32::from(pin)));
    }

    /// Sticky output and inline OUT enable
    pub fn set_out_special(&mut self, sticky: bool, has_enable_pin: bool, enable_bit_index: u8) {
        update(
            &mut self.execctrl,
            EXECCTRL::OUT_STICKY.val(u32::from(sticky))
                + EXECCTRL::INLINE_OUT_EN.val(u32::from(has_enable_pin))
                + EXECCTRL::OUT_EN_SEL.val(u32::from(enable_bit_index)),
        );
    }

    /// Source and level for `mov x, status`
    pub fn set_mov_status(&mut self, status: MovStatus, n: u8) {
        update(
            &mut self.execctrl,
            EXECCTRL::STATUS_SEL.val(u32::from(status == MovStatus::RxLessThan))
                + EXECCTRL::STATUS_N.val(u32::from(n)),
        );
    }
}
