use std::array;

use libdigiisa::{Register, Word, GPR_COUNT, REGISTER_COUNT};

/// General purpose registers plus the special registers as named fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegFile {
    pub general: [Word; GPR_COUNT],
    pub address: Word,
    pub data: Word,
    pub ram_address: Word,
    pub ram_data: Word,
    pub stack: Word,
    pub overflow: Word,
    pub input: Word,
}

impl RegFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, register: Register) -> Word {
        match register {
            Register::ADDRESS => self.address,
            Register::DATA => self.data,
            Register::RAM_ADDRESS => self.ram_address,
            Register::RAM_DATA => self.ram_data,
            Register::STACK => self.stack,
            Register::OVERFLOW => self.overflow,
            Register::INPUT => self.input,
            general => self.general[general.index()],
        }
    }

    pub fn register_mut(&mut self, register: Register) -> &mut Word {
        match register {
            Register::ADDRESS => &mut self.address,
            Register::DATA => &mut self.data,
            Register::RAM_ADDRESS => &mut self.ram_address,
            Register::RAM_DATA => &mut self.ram_data,
            Register::STACK => &mut self.stack,
            Register::OVERFLOW => &mut self.overflow,
            Register::INPUT => &mut self.input,
            general => &mut self.general[general.index()],
        }
    }

    /// Snapshot in register index order.
    pub fn array(&self) -> [Word; REGISTER_COUNT] {
        let mut registers = Register::all();
        array::from_fn(|_| registers.next().map_or(0, |register| self.register(register)))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
