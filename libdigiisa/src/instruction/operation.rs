use crate::{Register, Word, ROM_SIZE};

use super::{kind::InstructionKind, DecodeError, Instruction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionFlag {
    Negative,
    Zero,
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    AddWithOverflow,
    Sub,
    Mul,
    MulWithOverflow,
    Mod,
    Shl,
    Shr,
    Min,
    Max,
    And,
    Or,
    Nand,
    Nor,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparison {
    pub fn holds(&self, a: Word, b: Word) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Neq => a != b,
            Self::Lt => a < b,
            Self::Lte => a <= b,
            Self::Gt => a > b,
            Self::Gte => a >= b,
        }
    }
}

/// Validated form of an [`Instruction`], what the emulator actually executes.
/// Register operands are proper [`Register`]s and jump targets are in ROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Nop,
    Halt,
    /// Zero every register and clear the flags. Program counter stays.
    ResetState,
    /// `None` clears all flags.
    ClearFlags(Option<ConditionFlag>),

    Immediate { value: Word, to: Register },
    Copy { from: Register, to: Register },
    Clear(Register),

    Jump(usize),
    JumpRegister(Register),
    JumpIfFlag { flag: ConditionFlag, set: bool, target: usize },
    JumpIfCompare { comparison: Comparison, a: Register, b: Register, target: usize },

    Alu { op: AluOp, a: Register, b: Register, to: Register },
    Not { from: Register, to: Register },
    Increment(Register),
    Decrement(Register),

    RamLoad { pos: Word, to: Register },
    RamSave { from: Register, pos: Word },
    /// RAM position comes from the value of `from`.
    RamLoadIndirect { from: Register, to: Register },
    /// RAM position comes from the value of `to`, the stored value from `from`.
    RamSaveIndirect { from: Register, to: Register },

    Push(Register),
    Pop(Register),

    SevenSegment { from: Register, to: Register },
}

impl TryFrom<&Instruction> for Operation {
    type Error = DecodeError;

    fn try_from(instruction: &Instruction) -> Result<Self, Self::Error> {
        use InstructionKind as K;

        let [x, y, z] = instruction.operands;

        let reg = |word: Word| Register::from_word(word).ok_or(DecodeError::RegisterOverflow(word));
        let rom = |word: Word| {
            let pos = word as usize;
            if pos >= ROM_SIZE {
                return Err(DecodeError::RomOutOfBounds(pos));
            }
            Ok(pos)
        };

        let alu = |op| -> Result<Self, DecodeError> {
            Ok(Self::Alu {
                op,
                a: reg(x)?,
                b: reg(y)?,
                to: reg(z)?,
            })
        };
        let compare = |comparison| -> Result<Self, DecodeError> {
            Ok(Self::JumpIfCompare {
                comparison,
                a: reg(x)?,
                b: reg(y)?,
                target: rom(z)?,
            })
        };
        let jump_if = |flag, set| -> Result<Self, DecodeError> {
            Ok(Self::JumpIfFlag {
                flag,
                set,
                target: rom(x)?,
            })
        };

        let operation = match instruction.kind {
            K::Nop => Self::Nop,
            K::Hlt => Self::Halt,
            K::Rst => Self::ResetState,

            K::Clf => Self::ClearFlags(None),
            K::Cnf => Self::ClearFlags(Some(ConditionFlag::Negative)),
            K::Czf => Self::ClearFlags(Some(ConditionFlag::Zero)),
            K::Cof => Self::ClearFlags(Some(ConditionFlag::Overflow)),

            K::Imm => Self::Immediate {
                value: x,
                to: reg(y)?,
            },
            K::Cpy => Self::Copy {
                from: reg(x)?,
                to: reg(y)?,
            },
            K::Clr => Self::Clear(reg(x)?),

            K::Jmp => Self::Jump(rom(x)?),
            K::Jmr => Self::JumpRegister(reg(x)?),
            K::Jnf => jump_if(ConditionFlag::Negative, true)?,
            K::Jnn => jump_if(ConditionFlag::Negative, false)?,
            K::Jzf => jump_if(ConditionFlag::Zero, true)?,
            K::Jnz => jump_if(ConditionFlag::Zero, false)?,
            K::Jof => jump_if(ConditionFlag::Overflow, true)?,
            K::Jno => jump_if(ConditionFlag::Overflow, false)?,

            K::Eq => compare(Comparison::Eq)?,
            K::Neq => compare(Comparison::Neq)?,
            K::Lt => compare(Comparison::Lt)?,
            K::Lte => compare(Comparison::Lte)?,
            K::Gt => compare(Comparison::Gt)?,
            K::Gte => compare(Comparison::Gte)?,

            K::Add => alu(AluOp::Add)?,
            K::Ado => alu(AluOp::AddWithOverflow)?,
            K::Sub => alu(AluOp::Sub)?,
            K::Mul => alu(AluOp::Mul)?,
            K::Mlo => alu(AluOp::MulWithOverflow)?,
            K::Mod => alu(AluOp::Mod)?,
            K::Shl => alu(AluOp::Shl)?,
            K::Shr => alu(AluOp::Shr)?,
            K::Min => alu(AluOp::Min)?,
            K::Max => alu(AluOp::Max)?,
            K::Nnd => alu(AluOp::Nand)?,
            K::Or => alu(AluOp::Or)?,
            K::And => alu(AluOp::And)?,
            K::Nor => alu(AluOp::Nor)?,
            K::Xor => alu(AluOp::Xor)?,
            K::Not => Self::Not {
                from: reg(x)?,
                to: reg(y)?,
            },

            K::Inc => Self::Increment(reg(x)?),
            K::Dec => Self::Decrement(reg(x)?),

            K::Rld => Self::RamLoad {
                pos: x,
                to: reg(y)?,
            },
            K::Rsv => Self::RamSave {
                from: reg(x)?,
                pos: y,
            },
            K::Rlr => Self::RamLoadIndirect {
                from: reg(x)?,
                to: reg(y)?,
            },
            K::Rsr => Self::RamSaveIndirect {
                from: reg(x)?,
                to: reg(y)?,
            },

            K::Psh => Self::Push(reg(x)?),
            K::Pop => Self::Pop(reg(x)?),

            K::Seg => Self::SevenSegment {
                from: reg(x)?,
                to: reg(y)?,
            },
        };

        Ok(operation)
    }
}

impl Instruction {
    pub fn operation(&self) -> Result<Operation, DecodeError> {
        Operation::try_from(self)
    }
}
