use std::fmt::Display;

use kind::InstructionKind;
use thiserror::Error;

use crate::{Word, MAX_OPERANDS, MAX_REG, ROM_SIZE};

pub mod kind;
pub mod operation;


#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown opcode {0:02X}")]
    UnknownOpcode(Word),

    #[error("Register {0} greater than {max}", max = MAX_REG)]
    RegisterOverflow(Word),

    #[error("Position {0} outside of ROM (max size {max})", max = ROM_SIZE)]
    RomOutOfBounds(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    Register,
    Immediate,
    RomAddress,
    RamAddress,
}

/// A decoded instruction: the opcode's kind plus its raw operand bytes.
/// Operands past the kind's arity are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub kind: InstructionKind,
    operands: [Word; MAX_OPERANDS],
}

impl Instruction {
    pub const fn new(kind: InstructionKind) -> Self {
        Self {
            kind,
            operands: [0; MAX_OPERANDS],
        }
    }

    /// Sets the operands, truncated to the kind's arity.
    pub fn with_operands(mut self, operands: &[Word]) -> Self {
        let count = operands.len().min(self.kind.operand_count());
        self.operands = [0; MAX_OPERANDS];
        self.operands[..count].copy_from_slice(&operands[..count]);
        self
    }

    pub fn operands(&self) -> &[Word] {
        &self.operands[..self.kind.operand_count()]
    }

    pub fn width(&self) -> usize {
        self.kind.width()
    }

    pub fn assemble(&self) -> Vec<Word> {
        let mut output = Vec::with_capacity(self.width());

        output.push(self.kind.opcode());
        output.extend_from_slice(self.operands());

        output
    }

    /// Decodes the instruction starting at `pos`. Operand bytes past the end
    /// of `code` read as zero, the opcode byte itself must be in range.
    pub fn decode_at(code: &[Word], pos: usize) -> Result<Self, DecodeError> {
        let opcode = *code.get(pos).ok_or(DecodeError::RomOutOfBounds(pos))?;
        let kind = InstructionKind::from_opcode(opcode).ok_or(DecodeError::UnknownOpcode(opcode))?;

        let mut operands = [0; MAX_OPERANDS];
        for (index, operand) in operands.iter_mut().take(kind.width() - 1).enumerate() {
            *operand = code.get(pos + 1 + index).copied().unwrap_or(0);
        }

        Ok(Self::new(kind).with_operands(&operands))
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self.kind))?;

        for operand in self.operands() {
            f.write_fmt(format_args!(" {:02X}", operand))?;
        }

        Ok(())
    }
}
