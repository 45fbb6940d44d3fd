pub mod assembler;
pub mod instruction;
pub mod literal;
pub mod register;

pub use register::Register;

pub type Word = u8;

pub const ROM_SIZE: usize = 256;
pub const RAM_SIZE: usize = 256;
pub const STACK_SIZE: usize = 16;

/// Every register and memory cell holds values modulo this.
pub const MAX_INT: usize = Word::MAX as usize + 1;

pub const GPR_COUNT: usize = 8;
pub const REGISTER_COUNT: usize = 15;
pub const MAX_REG: usize = REGISTER_COUNT - 1;

pub const MAX_INSTRUCTION_WIDTH: usize = 4;
pub const MAX_OPERANDS: usize = MAX_INSTRUCTION_WIDTH - 1;
