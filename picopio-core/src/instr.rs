//! Instruction word classification and encoding
//!
//! PIO instructions are 16 bits wide. The top three bits select the opcode;
//! a JMP carries an absolute instruction memory address in its low five bits,
//! which is the only operand that changes when a program is moved.

use pio::{InstructionOperands, JmpCondition, SetDestination};

/// Opcode bits of an instruction word
pub const OPCODE_MASK: u16 = 0xE000;

/// Opcode bits of a JMP
pub const OPCODE_JMP: u16 = 0x0000;

/// Absolute target address of a JMP
pub const JMP_ADDRESS_MASK: u16 = 0x001F;

/// Pins a single SET instruction can reach.
///
/// SET data is five bits wide on the RP2040; other PIO revisions may differ.
pub const SET_MAX_PINS: u8 = 5;

/// Whether `word` is a JMP
pub const fn is_jmp(word: u16) -> bool {
    word & OPCODE_MASK == OPCODE_JMP
}

/// Move `word` for a program loaded at `offset`
///
/// JMP targets are shifted by `offset`, wrapping within the address field.
/// Every other instruction is position independent and comes back unchanged.
pub const fn relocate(word: u16, offset: u8) -> u16 {
    if !is_jmp(word) {
        return word;
    }
    let address = (word & JMP_ADDRESS_MASK).wrapping_add(offset as u16) & JMP_ADDRESS_MASK;
    (word & !JMP_ADDRESS_MASK) | address
}

/// Unconditional jump to `address`
pub fn jmp(address: u8) -> u16 {
    InstructionOperands::JMP {
        condition: JmpCondition::Always,
        address: address & JMP_ADDRESS_MASK as u8,
    }
    .encode()
}

/// `set pindirs, bits`
pub fn set_pindirs(bits: u8) -> u16 {
    InstructionOperands::SET {
        destination: SetDestination::PINDIRS,
        data: bits & 0x1F,
    }
    .encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(is_jmp(0x0000));
        assert!(is_jmp(0x1F5E));
        assert!(!is_jmp(0x6008)); // out pins, 8
        assert!(!is_jmp(0xB042)); // nop side 1
        assert!(!is_jmp(0xE001)); // set pins, 1
    }

    #[test]
    fn test_relocate_jmp() {
        // jmp 3 with condition bits and delay set
        let word = 0x1F43;
        assert_eq!(relocate(word, 10), 0x1F4D);
        assert_eq!(relocate(word, 0), word);
    }

    #[test]
    fn test_relocate_wraps_within_field() {
        // jmp 16 moved by 24 lands on (16 + 24) mod 32
        assert_eq!(relocate(0x0010, 24), 0x0008);
        // The condition field above the address must not be disturbed
        assert_eq!(relocate(0x00FF, 1) & !JMP_ADDRESS_MASK, 0x00E0);
    }

    #[test]
    fn test_relocate_leaves_other_opcodes() {
        for word in [0x2020u16, 0x4001, 0x6008, 0x8080, 0xA042, 0xC000, 0xE09F] {
            assert_eq!(relocate(word, 17), word);
        }
    }

    #[test]
    fn test_encoders() {
        assert_eq!(jmp(0), 0x0000);
        assert_eq!(jmp(29), 0x001D);
        assert_eq!(set_pindirs(0x1F), 0xE09F);
        assert_eq!(set_pindirs(0), 0xE080);
    }
}
