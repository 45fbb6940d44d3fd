use libdigiisa::{
    instruction::{DecodeError, Instruction},
    Word, MAX_REG, RAM_SIZE, ROM_SIZE,
};
use log::{debug, warn};
use thiserror::Error;

use crate::Emulator;

mod parsed;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOk {
    /// The program counter advanced past the instruction.
    Normal,
    /// The instruction set the program counter itself.
    Jumped,
    /// The emulator is halted. Also returned for steps taken while halted.
    Halted,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteErr {
    #[error("Register {0} greater than {max}", max = MAX_REG)]
    RegisterOverflow(Word),

    #[error("Position {0} outside of ROM (max size {max})", max = ROM_SIZE)]
    RomOutOfBounds(usize),

    #[error("Position {0} outside of RAM (max size {max})", max = RAM_SIZE)]
    RamOutOfBounds(usize),

    #[error("Unknown opcode {opcode:02X} at counter {pc}")]
    UnknownOpcode { opcode: Word, pc: usize },

    #[error("Division by zero")]
    DivisionByZero,
}

impl ExecuteErr {
    fn from_decode(error: DecodeError, pc: usize) -> Self {
        match error {
            DecodeError::UnknownOpcode(opcode) => Self::UnknownOpcode { opcode, pc },
            DecodeError::RegisterOverflow(register) => Self::RegisterOverflow(register),
            DecodeError::RomOutOfBounds(pos) => Self::RomOutOfBounds(pos),
        }
    }
}

impl Emulator {
    /// Runs a single clock cycle: fetch, decode, execute, advance.
    pub fn step(&mut self) -> Result<ExecuteOk, ExecuteErr> {
        if self.halted {
            return Ok(ExecuteOk::Halted);
        }

        let instruction = self.parse_next_instruction()?;
        let operation = instruction
            .operation()
            .map_err(|e| ExecuteErr::from_decode(e, self.pc))?;

        debug!("{:3}: {}", self.pc, instruction);

        // Stack and seven segment instructions hold the busy line while they run.
        self.busy = instruction.kind.is_heavy();
        let result = self.execute_operation(operation);
        self.busy = false;

        let result = result?;

        match result {
            ExecuteOk::Normal => self.pc += instruction.width(),
            ExecuteOk::Jumped => {}
            ExecuteOk::Halted => {
                self.halted = true;
                self.pc += instruction.width();
            }
        }

        self.current_instruction = Some(instruction);

        Ok(result)
    }

    /// Steps until halted, for at most `limit` steps. Also stops once the
    /// program counter runs off the end of ROM. Returns the number of steps
    /// taken.
    pub fn execute_to_halt(&mut self, limit: usize) -> Result<usize, ExecuteErr> {
        let mut executed = 0;

        while executed < limit && !self.halted && self.pc < ROM_SIZE {
            self.step()?;
            executed += 1;
        }

        Ok(executed)
    }

    fn parse_next_instruction(&self) -> Result<Instruction, ExecuteErr> {
        if self.pc >= ROM_SIZE {
            warn!("Step requested past the end of ROM at {}", self.pc);
        }

        Instruction::decode_at(&self.rom, self.pc).map_err(|e| ExecuteErr::from_decode(e, self.pc))
    }
}
