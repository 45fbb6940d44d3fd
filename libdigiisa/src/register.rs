use std::fmt::Display;

use bimap::BiMap;
use lazy_static::lazy_static;

use crate::{Word, GPR_COUNT, MAX_REG, REGISTER_COUNT};

lazy_static! {
    static ref ALIAS_REGISTER_BIMAP: BiMap<&'static str, Register> = BiMap::from_iter([
        ("ADDR", Register::ADDRESS),
        ("DATA", Register::DATA),
        ("RAMA", Register::RAM_ADDRESS),
        ("RAMD", Register::RAM_DATA),
        ("STCK", Register::STACK),
        ("OVFL", Register::OVERFLOW),
        ("INPT", Register::INPUT),
    ]);
}

/// Index into the register file. Only indices up to [`MAX_REG`] can be
/// constructed, so holders never need to re-check bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(usize);

impl Register {
    pub const ADDRESS: Self = Self(8);
    pub const DATA: Self = Self(9);
    pub const RAM_ADDRESS: Self = Self(10);
    pub const RAM_DATA: Self = Self(11);
    pub const STACK: Self = Self(12);
    pub const OVERFLOW: Self = Self(13);
    pub const INPUT: Self = Self(14);

    pub const fn new(index: usize) -> Option<Self> {
        if index <= MAX_REG {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn general(index: usize) -> Option<Self> {
        if index < GPR_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn from_word(word: Word) -> Option<Self> {
        Self::new(word as usize)
    }

    pub const fn index(&self) -> usize {
        self.0
    }

    pub const fn is_general(&self) -> bool {
        self.0 < GPR_COUNT
    }

    pub fn from_alias(alias: &str) -> Option<Self> {
        ALIAS_REGISTER_BIMAP.get_by_left(alias).copied()
    }

    pub fn alias(&self) -> Option<&'static str> {
        ALIAS_REGISTER_BIMAP.get_by_right(self).copied()
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..REGISTER_COUNT).map(Self)
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.alias() {
            Some(alias) => f.write_str(alias),
            None => f.write_fmt(format_args!("%{}", self.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Register;

    #[test]
    fn bounds_are_enforced_on_construction() {
        assert_eq!(Register::new(14), Some(Register::INPUT));
        assert_eq!(Register::new(15), None);
        assert_eq!(Register::from_word(255), None);
        assert_eq!(Register::general(8), None);
    }

    #[test]
    fn special_registers_have_aliases() {
        for register in Register::all() {
            assert_eq!(register.alias().is_none(), register.is_general(), "{:?}", register);
        }

        assert_eq!(Register::from_alias("STCK"), Some(Register::STACK));
        assert_eq!(Register::from_alias("stck"), None);
    }
}
