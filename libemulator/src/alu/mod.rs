use flags::ALUFlags;
use libdigiisa::{instruction::operation::AluOp, Word};

pub mod flags;


/// Threshold for the overflow flag of the with-overflow variants, whose
/// carried part already lands in the overflow register.
const WIDE_MAX: u32 = Word::MAX as u32 * Word::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    pub value: Word,
    /// High part of the unreduced result, for the with-overflow variants.
    pub carried: Option<Word>,
}

/// Every operation only touches the flags it documents, the others keep
/// their previous state.
#[derive(Debug, Clone, Default)]
pub struct ALU {
    pub flags: ALUFlags,
}

impl ALU {
    pub fn new() -> Self {
        Self {
            flags: ALUFlags::empty(),
        }
    }

    /// Returns `None` on a modulo by zero.
    pub fn compute(&mut self, op: AluOp, a: Word, b: Word) -> Option<AluOutput> {
        let (value, carried) = match op {
            AluOp::Add => (self.add(a, b), None),
            AluOp::AddWithOverflow => {
                let (value, carried) = self.add_with_overflow(a, b);
                (value, Some(carried))
            }
            AluOp::Sub => (self.sub(a, b), None),
            AluOp::Mul => (self.mul(a, b), None),
            AluOp::MulWithOverflow => {
                let (value, carried) = self.mul_with_overflow(a, b);
                (value, Some(carried))
            }
            AluOp::Mod => (self.modulo(a, b)?, None),
            AluOp::Shl => (self.shl(a, b), None),
            AluOp::Shr => (self.shr(a, b), None),
            AluOp::Min => (self.zero_by(a.min(b)), None),
            AluOp::Max => (self.zero_by(a.max(b)), None),
            AluOp::And => (self.zero_by(a & b), None),
            AluOp::Or => (self.zero_by(a | b), None),
            AluOp::Nand => (self.zero_by(!(a & b)), None),
            AluOp::Nor => (self.zero_by(!(a | b)), None),
            AluOp::Xor => (self.zero_by(a ^ b), None),
        };

        Some(AluOutput { value, carried })
    }

    /// Overflow and zero.
    pub fn add(&mut self, a: Word, b: Word) -> Word {
        let raw = a as u32 + b as u32;
        self.overflow_by(raw)
    }

    pub fn add_with_overflow(&mut self, a: Word, b: Word) -> (Word, Word) {
        let raw = a as u32 + b as u32;
        self.wide_overflow_by(raw)
    }

    /// Negative and zero.
    pub fn sub(&mut self, a: Word, b: Word) -> Word {
        self.flags.set(ALUFlags::NEGATIVE, b > a);
        self.zero_by(a.wrapping_sub(b))
    }

    pub fn mul(&mut self, a: Word, b: Word) -> Word {
        let raw = a as u32 * b as u32;
        self.overflow_by(raw)
    }

    pub fn mul_with_overflow(&mut self, a: Word, b: Word) -> (Word, Word) {
        let raw = a as u32 * b as u32;
        self.wide_overflow_by(raw)
    }

    pub fn modulo(&mut self, a: Word, b: Word) -> Option<Word> {
        a.checked_rem(b).map(|value| self.zero_by(value))
    }

    /// Shifting by a whole byte or more leaves nothing.
    pub fn shl(&mut self, a: Word, b: Word) -> Word {
        self.zero_by(a.checked_shl(b as u32).unwrap_or(0))
    }

    pub fn shr(&mut self, a: Word, b: Word) -> Word {
        self.zero_by(a.checked_shr(b as u32).unwrap_or(0))
    }

    pub fn not(&mut self, a: Word) -> Word {
        self.zero_by(!a)
    }

    pub fn inc(&mut self, a: Word) -> Word {
        self.overflow_by(a as u32 + 1)
    }

    pub fn dec(&mut self, a: Word) -> Word {
        self.flags.set(ALUFlags::NEGATIVE, a == 0);
        self.zero_by(a.wrapping_sub(1))
    }

    fn overflow_by(&mut self, raw: u32) -> Word {
        self.flags.set(ALUFlags::OVERFLOW, raw > Word::MAX as u32);
        self.zero_by(raw as Word)
    }

    fn wide_overflow_by(&mut self, raw: u32) -> (Word, Word) {
        self.flags.set(ALUFlags::OVERFLOW, raw > WIDE_MAX);
        (self.zero_by(raw as Word), (raw >> Word::BITS) as Word)
    }

    fn zero_by(&mut self, value: Word) -> Word {
        self.flags.set(ALUFlags::ZERO, value == 0);
        value
    }
}
