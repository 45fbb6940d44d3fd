use bitflags::bitflags;
use libdigiisa::instruction::operation::ConditionFlag;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ALUFlags: u8 {
        const NEGATIVE = 0b001;
        const ZERO     = 0b010;
        const OVERFLOW = 0b100;
    }
}

impl From<ConditionFlag> for ALUFlags {
    fn from(flag: ConditionFlag) -> Self {
        match flag {
            ConditionFlag::Negative => Self::NEGATIVE,
            ConditionFlag::Zero => Self::ZERO,
            ConditionFlag::Overflow => Self::OVERFLOW,
        }
    }
}
