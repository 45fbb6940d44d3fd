use libdigiisa::{instruction::operation::Operation, Register, Word, ROM_SIZE, STACK_SIZE};

use crate::{alu::flags::ALUFlags, sevenseg, Emulator};

use super::{ExecuteErr, ExecuteOk};

impl Emulator {
    pub fn execute_operation(&mut self, operation: Operation) -> Result<ExecuteOk, ExecuteErr> {
        match operation {
            Operation::Nop => {}

            Operation::Halt => return Ok(ExecuteOk::Halted),

            Operation::ResetState => self.reset_state(),

            Operation::ClearFlags(Some(flag)) => self.alu.flags.remove(flag.into()),
            Operation::ClearFlags(None) => self.alu.flags = ALUFlags::empty(),

            Operation::Immediate { value, to } => {
                *self.reg_mut(to) = value;
            }

            Operation::Copy { from, to } => {
                let value = self.reg(from);
                *self.reg_mut(to) = value;
            }

            Operation::Clear(register) => {
                *self.reg_mut(register) = 0;
            }

            Operation::Jump(target) => return self.jump(target),

            Operation::JumpRegister(register) => {
                let target = self.reg(register) as usize % ROM_SIZE;
                return self.jump(target);
            }

            Operation::JumpIfFlag { flag, set, target } => {
                if self.alu.flags.contains(flag.into()) == set {
                    return self.jump(target);
                }
            }

            Operation::JumpIfCompare {
                comparison,
                a,
                b,
                target,
            } => {
                if comparison.holds(self.reg(a), self.reg(b)) {
                    return self.jump(target);
                }
            }

            Operation::Alu { op, a, b, to } => {
                let a = self.reg(a);
                let b = self.reg(b);

                let output = self
                    .alu
                    .compute(op, a, b)
                    .ok_or(ExecuteErr::DivisionByZero)?;

                *self.reg_mut(to) = output.value;

                if let Some(carried) = output.carried {
                    *self.reg_mut(Register::OVERFLOW) = carried;
                }
            }

            Operation::Not { from, to } => {
                let value = self.reg(from);
                *self.reg_mut(to) = self.alu.not(value);
            }

            Operation::Increment(register) => {
                let value = self.reg(register);
                *self.reg_mut(register) = self.alu.inc(value);
            }

            Operation::Decrement(register) => {
                let value = self.reg(register);
                *self.reg_mut(register) = self.alu.dec(value);
            }

            Operation::RamLoad { pos, to } => {
                let value = self.memory.load(pos as usize);
                *self.reg_mut(to) = value;
            }

            Operation::RamSave { from, pos } => {
                let value = self.reg(from);
                self.memory.save(pos as usize, value);
            }

            Operation::RamLoadIndirect { from, to } => {
                let pos = self.reg(from);
                let value = self.memory.load(pos as usize);
                *self.reg_mut(to) = value;
            }

            Operation::RamSaveIndirect { from, to } => {
                let pos = self.reg(to);
                let value = self.reg(from);
                self.memory.save(pos as usize, value);
            }

            Operation::Push(from) => {
                let pointer = self.reg(Register::STACK);
                let value = self.reg(from);

                self.memory.save(pointer as usize, value);
                *self.reg_mut(Register::STACK) = ((pointer as usize + 1) % STACK_SIZE) as Word;
            }

            Operation::Pop(to) => {
                let pointer = self.reg(Register::STACK) as usize;
                let pointer = ((pointer + STACK_SIZE - 1) % STACK_SIZE) as Word;

                *self.reg_mut(Register::STACK) = pointer;
                let value = self.memory.load(pointer as usize);
                *self.reg_mut(to) = value;
            }

            Operation::SevenSegment { from, to } => {
                // Unknown codes leave the destination as it was.
                if let Some(mask) = sevenseg::segments(self.reg(from)) {
                    *self.reg_mut(to) = mask;
                }
            }
        }

        Ok(ExecuteOk::Normal)
    }

    fn jump(&mut self, target: usize) -> Result<ExecuteOk, ExecuteErr> {
        if target >= ROM_SIZE {
            return Err(ExecuteErr::RomOutOfBounds(target));
        }

        self.pc = target;
        Ok(ExecuteOk::Jumped)
    }

    fn reg(&self, register: Register) -> Word {
        self.reg_file.register(register)
    }

    fn reg_mut(&mut self, register: Register) -> &mut Word {
        self.reg_file.register_mut(register)
    }
}
