use std::fmt::Display;

use bimap::BiMap;
use lazy_static::lazy_static;

use crate::Word;

use super::OperandKind;

/// Opcode table in declaration order. The assembler's first pass walks it in
/// this order when matching mnemonic prefixes.
const OPCODE_TABLE: [(InstructionKind, Word, &str); 49] = [
    (InstructionKind::Nop, 0x00, "NOP"),
    (InstructionKind::Imm, 0x81, "IMM"),
    (InstructionKind::Hlt, 0x07, "HLT"),
    (InstructionKind::Cpy, 0x91, "CPY"),
    (InstructionKind::Clr, 0x50, "CLR"),
    (InstructionKind::Rst, 0x10, "RST"),
    (InstructionKind::Clf, 0x08, "CLF"),
    (InstructionKind::Cnf, 0x09, "CNF"),
    (InstructionKind::Czf, 0x0A, "CZF"),
    (InstructionKind::Cof, 0x0B, "COF"),
    (InstructionKind::Jnf, 0x49, "JNF"),
    (InstructionKind::Jnn, 0x4D, "JNN"),
    (InstructionKind::Jzf, 0x4A, "JZF"),
    (InstructionKind::Jnz, 0x4E, "JNZ"),
    (InstructionKind::Jof, 0x4B, "JOF"),
    (InstructionKind::Jno, 0x4F, "JNO"),
    (InstructionKind::Eq, 0xF1, "EQ"),
    (InstructionKind::Lt, 0xF2, "LT"),
    (InstructionKind::Lte, 0xF3, "LTE"),
    (InstructionKind::Neq, 0xF5, "NEQ"),
    (InstructionKind::Gte, 0xF6, "GTE"),
    (InstructionKind::Gt, 0xF7, "GT"),
    (InstructionKind::Nnd, 0xE0, "NND"),
    (InstructionKind::Or, 0xE1, "OR"),
    (InstructionKind::And, 0xE2, "AND"),
    (InstructionKind::Nor, 0xE3, "NOR"),
    (InstructionKind::Not, 0xA4, "NOT"),
    (InstructionKind::Xor, 0xE5, "XOR"),
    (InstructionKind::Jmp, 0x64, "JMP"),
    (InstructionKind::Jmr, 0x65, "JMR"),
    (InstructionKind::Inc, 0x68, "INC"),
    (InstructionKind::Dec, 0x69, "DEC"),
    (InstructionKind::Add, 0xE8, "ADD"),
    (InstructionKind::Sub, 0xE9, "SUB"),
    (InstructionKind::Mul, 0xEA, "MUL"),
    (InstructionKind::Mod, 0xEB, "MOD"),
    (InstructionKind::Shl, 0xEC, "SHL"),
    (InstructionKind::Shr, 0xED, "SHR"),
    (InstructionKind::Min, 0xEE, "MIN"),
    (InstructionKind::Max, 0xEF, "MAX"),
    (InstructionKind::Rld, 0x98, "RLD"),
    (InstructionKind::Rsv, 0x99, "RSV"),
    (InstructionKind::Rlr, 0x9A, "RLR"),
    (InstructionKind::Rsr, 0x9B, "RSR"),
    (InstructionKind::Psh, 0x5C, "PSH"),
    (InstructionKind::Pop, 0x5D, "POP"),
    (InstructionKind::Seg, 0xBF, "SEG"),
    (InstructionKind::Ado, 0xF8, "ADO"),
    (InstructionKind::Mlo, 0xFA, "MLO"),
];

lazy_static! {
    static ref KIND_OPCODE_BIMAP: BiMap<InstructionKind, Word> = OPCODE_TABLE
        .iter()
        .map(|(kind, opcode, _)| (*kind, *opcode))
        .collect();
    static ref KIND_MNEMONIC_BIMAP: BiMap<InstructionKind, &'static str> = OPCODE_TABLE
        .iter()
        .map(|(kind, _, mnemonic)| (*kind, *mnemonic))
        .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    Nop,
    Hlt,
    Rst,

    Clf,
    Cnf,
    Czf,
    Cof,

    Imm,
    Cpy,
    Clr,

    Jmp,
    Jmr,
    Jnf,
    Jnn,
    Jzf,
    Jnz,
    Jof,
    Jno,

    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,

    Add,
    Ado,
    Sub,
    Mul,
    Mlo,
    Mod,
    Shl,
    Shr,
    Min,
    Max,

    Nnd,
    Or,
    And,
    Nor,
    Xor,
    Not,

    Inc,
    Dec,

    Rld,
    Rsv,
    Rlr,
    Rsr,

    Psh,
    Pop,

    Seg,
}

impl InstructionKind {
    pub fn from_opcode(opcode: Word) -> Option<Self> {
        KIND_OPCODE_BIMAP.get_by_right(&opcode).copied()
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        KIND_MNEMONIC_BIMAP.get_by_right(mnemonic).copied()
    }

    /// All kinds in opcode table order.
    pub fn iter() -> impl Iterator<Item = Self> {
        OPCODE_TABLE.iter().map(|(kind, _, _)| *kind)
    }

    pub fn opcode(&self) -> Word {
        *KIND_OPCODE_BIMAP
            .get_by_left(self)
            .expect("No opcode mapping for instruction kind")
    }

    pub fn mnemonic(&self) -> &'static str {
        KIND_MNEMONIC_BIMAP
            .get_by_left(self)
            .expect("No mnemonic mapping for instruction kind")
    }

    /// Bytes taken up in ROM, encoded in the top two bits of the opcode.
    pub fn width(&self) -> usize {
        ((self.opcode() >> 6) & 0b11) as usize + 1
    }

    pub fn operand_count(&self) -> usize {
        self.operand_kinds().len()
    }

    pub fn operand_kinds(&self) -> &'static [OperandKind] {
        use OperandKind::{Immediate, RamAddress, Register, RomAddress};

        match self {
            Self::Nop | Self::Hlt | Self::Rst => &[],
            Self::Clf | Self::Cnf | Self::Czf | Self::Cof => &[],

            Self::Imm => &[Immediate, Register],
            Self::Cpy => &[Register, Register],
            Self::Clr => &[Register],

            Self::Jmp => &[RomAddress],
            Self::Jmr => &[Register],
            Self::Jnf | Self::Jnn | Self::Jzf | Self::Jnz | Self::Jof | Self::Jno => &[RomAddress],

            Self::Eq | Self::Neq | Self::Lt | Self::Lte | Self::Gt | Self::Gte => {
                &[Register, Register, RomAddress]
            }

            Self::Add
            | Self::Ado
            | Self::Sub
            | Self::Mul
            | Self::Mlo
            | Self::Mod
            | Self::Shl
            | Self::Shr
            | Self::Min
            | Self::Max
            | Self::Nnd
            | Self::Or
            | Self::And
            | Self::Nor
            | Self::Xor => &[Register, Register, Register],
            Self::Not => &[Register, Register],

            Self::Inc | Self::Dec => &[Register],

            Self::Rld => &[RamAddress, Register],
            Self::Rsv => &[Register, RamAddress],
            Self::Rlr | Self::Rsr => &[Register, Register],

            Self::Psh | Self::Pop => &[Register],

            Self::Seg => &[Register, Register],
        }
    }

    /// Heavy instructions raise the emulator's busy indicator while running.
    pub fn is_heavy(&self) -> bool {
        matches!(self, Self::Psh | Self::Pop | Self::Seg)
    }
}

impl Display for InstructionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
