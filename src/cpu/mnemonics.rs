/*!
mnemonics.rs - Static opcode -> (name, length) metadata for trace output.

This table is independent of the `table_dispatch` feature: it exists purely
to let `crate::trace` format nestest-style log lines without re-deriving an
opcode's instruction length from its addressing mode on every call. The
match-based dispatcher in `dispatch::fallback` remains the sole source of
execution semantics; this table only describes how many bytes an opcode
occupies and what name to print.

Undocumented opcodes are reported as `"???"` with length 1, matching how the
fallback dispatcher treats them (halts the CPU rather than emulating them).
*/

#![allow(dead_code)]

/// Opcode display name and total instruction length in bytes (including the opcode byte).
#[derive(Copy, Clone, Debug)]
pub struct OpMeta {
    pub name: &'static str,
    pub len: u8,
}

const fn m(name: &'static str, len: u8) -> OpMeta {
    OpMeta { name, len }
}

const UNK: OpMeta = m("???", 1);

/// Return display metadata for `opcode`. Always returns a valid entry; unknown
/// or undocumented opcodes report `"???"` with length 1.
pub fn opcode_meta(opcode: u8) -> OpMeta {
    OPCODE_TABLE[opcode as usize]
}

static OPCODE_TABLE: [OpMeta; 256] = {
    let mut t = [UNK; 256];

    // Loads
    t[0xA9] = m("LDA", 2);
    t[0xA5] = m("LDA", 2);
    t[0xB5] = m("LDA", 2);
    t[0xAD] = m("LDA", 3);
    t[0xBD] = m("LDA", 3);
    t[0xB9] = m("LDA", 3);
    t[0xA1] = m("LDA", 2);
    t[0xB1] = m("LDA", 2);
    t[0xA2] = m("LDX", 2);
    t[0xA6] = m("LDX", 2);
    t[0xB6] = m("LDX", 2);
    t[0xAE] = m("LDX", 3);
    t[0xBE] = m("LDX", 3);
    t[0xA0] = m("LDY", 2);
    t[0xA4] = m("LDY", 2);
    t[0xB4] = m("LDY", 2);
    t[0xAC] = m("LDY", 3);
    t[0xBC] = m("LDY", 3);

    // Stores
    t[0x85] = m("STA", 2);
    t[0x95] = m("STA", 2);
    t[0x8D] = m("STA", 3);
    t[0x9D] = m("STA", 3);
    t[0x99] = m("STA", 3);
    t[0x81] = m("STA", 2);
    t[0x91] = m("STA", 2);
    t[0x86] = m("STX", 2);
    t[0x96] = m("STX", 2);
    t[0x8E] = m("STX", 3);
    t[0x84] = m("STY", 2);
    t[0x94] = m("STY", 2);
    t[0x8C] = m("STY", 3);

    // Transfers
    t[0xAA] = m("TAX", 1);
    t[0xA8] = m("TAY", 1);
    t[0x8A] = m("TXA", 1);
    t[0x98] = m("TYA", 1);
    t[0xBA] = m("TSX", 1);
    t[0x9A] = m("TXS", 1);

    // Stack
    t[0x48] = m("PHA", 1);
    t[0x68] = m("PLA", 1);
    t[0x08] = m("PHP", 1);
    t[0x28] = m("PLP", 1);

    // Increment / decrement registers
    t[0xE8] = m("INX", 1);
    t[0xC8] = m("INY", 1);
    t[0xCA] = m("DEX", 1);
    t[0x88] = m("DEY", 1);

    // Increment / decrement memory
    t[0xE6] = m("INC", 2);
    t[0xF6] = m("INC", 2);
    t[0xEE] = m("INC", 3);
    t[0xFE] = m("INC", 3);
    t[0xC6] = m("DEC", 2);
    t[0xD6] = m("DEC", 2);
    t[0xCE] = m("DEC", 3);
    t[0xDE] = m("DEC", 3);

    // AND
    t[0x29] = m("AND", 2);
    t[0x25] = m("AND", 2);
    t[0x35] = m("AND", 2);
    t[0x2D] = m("AND", 3);
    t[0x3D] = m("AND", 3);
    t[0x39] = m("AND", 3);
    t[0x21] = m("AND", 2);
    t[0x31] = m("AND", 2);

    // ORA
    t[0x09] = m("ORA", 2);
    t[0x05] = m("ORA", 2);
    t[0x15] = m("ORA", 2);
    t[0x0D] = m("ORA", 3);
    t[0x1D] = m("ORA", 3);
    t[0x19] = m("ORA", 3);
    t[0x01] = m("ORA", 2);
    t[0x11] = m("ORA", 2);

    // EOR
    t[0x49] = m("EOR", 2);
    t[0x45] = m("EOR", 2);
    t[0x55] = m("EOR", 2);
    t[0x4D] = m("EOR", 3);
    t[0x5D] = m("EOR", 3);
    t[0x59] = m("EOR", 3);
    t[0x41] = m("EOR", 2);
    t[0x51] = m("EOR", 2);

    // BIT
    t[0x24] = m("BIT", 2);
    t[0x2C] = m("BIT", 3);

    // Shifts / rotates
    t[0x0A] = m("ASL", 1);
    t[0x06] = m("ASL", 2);
    t[0x16] = m("ASL", 2);
    t[0x0E] = m("ASL", 3);
    t[0x1E] = m("ASL", 3);
    t[0x4A] = m("LSR", 1);
    t[0x46] = m("LSR", 2);
    t[0x56] = m("LSR", 2);
    t[0x4E] = m("LSR", 3);
    t[0x5E] = m("LSR", 3);
    t[0x2A] = m("ROL", 1);
    t[0x26] = m("ROL", 2);
    t[0x36] = m("ROL", 2);
    t[0x2E] = m("ROL", 3);
    t[0x3E] = m("ROL", 3);
    t[0x6A] = m("ROR", 1);
    t[0x66] = m("ROR", 2);
    t[0x76] = m("ROR", 2);
    t[0x6E] = m("ROR", 3);
    t[0x7E] = m("ROR", 3);

    // Flags
    t[0x18] = m("CLC", 1);
    t[0x38] = m("SEC", 1);
    t[0x58] = m("CLI", 1);
    t[0x78] = m("SEI", 1);
    t[0xD8] = m("CLD", 1);
    t[0xF8] = m("SED", 1);
    t[0xB8] = m("CLV", 1);

    // Compare
    t[0xC9] = m("CMP", 2);
    t[0xC5] = m("CMP", 2);
    t[0xD5] = m("CMP", 2);
    t[0xCD] = m("CMP", 3);
    t[0xDD] = m("CMP", 3);
    t[0xD9] = m("CMP", 3);
    t[0xC1] = m("CMP", 2);
    t[0xD1] = m("CMP", 2);
    t[0xE0] = m("CPX", 2);
    t[0xE4] = m("CPX", 2);
    t[0xEC] = m("CPX", 3);
    t[0xC0] = m("CPY", 2);
    t[0xC4] = m("CPY", 2);
    t[0xCC] = m("CPY", 3);

    // Branches
    t[0x10] = m("BPL", 2);
    t[0x30] = m("BMI", 2);
    t[0x50] = m("BVC", 2);
    t[0x70] = m("BVS", 2);
    t[0x90] = m("BCC", 2);
    t[0xB0] = m("BCS", 2);
    t[0xD0] = m("BNE", 2);
    t[0xF0] = m("BEQ", 2);

    // Jumps / subroutines / returns
    t[0x4C] = m("JMP", 3);
    t[0x6C] = m("JMP", 3);
    t[0x20] = m("JSR", 3);
    t[0x60] = m("RTS", 1);

    // ADC / SBC
    t[0x69] = m("ADC", 2);
    t[0x65] = m("ADC", 2);
    t[0x75] = m("ADC", 2);
    t[0x6D] = m("ADC", 3);
    t[0x7D] = m("ADC", 3);
    t[0x79] = m("ADC", 3);
    t[0x61] = m("ADC", 2);
    t[0x71] = m("ADC", 2);
    t[0xE9] = m("SBC", 2);
    t[0xE5] = m("SBC", 2);
    t[0xF5] = m("SBC", 2);
    t[0xED] = m("SBC", 3);
    t[0xFD] = m("SBC", 3);
    t[0xF9] = m("SBC", 3);
    t[0xE1] = m("SBC", 2);
    t[0xF1] = m("SBC", 2);

    // Interrupts / misc
    t[0x00] = m("BRK", 2); // actually 1 byte, but BRK reads a dummy padding byte
    t[0x40] = m("RTI", 1);
    t[0xEA] = m("NOP", 1);

    t
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_opcode_metadata() {
        assert_eq!(opcode_meta(0xA9).name, "LDA");
        assert_eq!(opcode_meta(0xA9).len, 2);
        assert_eq!(opcode_meta(0x4C).len, 3);
        assert_eq!(opcode_meta(0x00).name, "BRK");
        assert_eq!(opcode_meta(0x00).len, 2);
    }

    #[test]
    fn unknown_opcode_defaults() {
        let meta = opcode_meta(0x02);
        assert_eq!(meta.name, "???");
        assert_eq!(meta.len, 1);
    }
}
