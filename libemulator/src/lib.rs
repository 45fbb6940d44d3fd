use std::fmt::Display;

use alu::{flags::ALUFlags, ALU};
use libdigiisa::{
    assembler::{self, AssemblyError, AssemblyOutput},
    instruction::Instruction,
    Register, Word, MAX_INT, REGISTER_COUNT, ROM_SIZE,
};
use log::debug;
use memory::Memory;
use regfile::RegFile;
use thiserror::Error;

pub mod alu;
pub mod execute;
pub mod memory;
pub mod regfile;
pub mod sevenseg;

pub use execute::{ExecuteErr, ExecuteOk};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadErr {
    #[error("Program of {0} bytes doesn't fit into ROM (max size {max})", max = ROM_SIZE)]
    RomTooLarge(usize),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

pub struct Emulator {
    rom: [Word; ROM_SIZE],
    memory: Memory,
    reg_file: RegFile,
    alu: ALU,
    pc: usize,

    halted: bool,
    busy: bool,
    current_instruction: Option<Instruction>,
}

impl Emulator {
    pub fn new() -> Self {
        Self {
            rom: [0; ROM_SIZE],
            memory: Memory::default(),
            reg_file: RegFile::new(),
            alu: ALU::new(),
            pc: 0,
            halted: false,
            busy: false,
            current_instruction: None,
        }
    }

    pub fn with_program(program: &[Word]) -> Result<Self, LoadErr> {
        let mut emulator = Self::new();
        emulator.load(program)?;

        Ok(emulator)
    }

    /// Replaces the ROM, zero-padding it. Registers, RAM and the program
    /// counter are left alone.
    pub fn load(&mut self, program: &[Word]) -> Result<(), LoadErr> {
        if program.len() > ROM_SIZE {
            return Err(LoadErr::RomTooLarge(program.len()));
        }

        self.rom = [0; ROM_SIZE];
        self.rom[..program.len()].copy_from_slice(program);

        debug!("Loaded {} bytes of program", program.len());

        Ok(())
    }

    pub fn load_string(&mut self, source: &str) -> Result<AssemblyOutput, LoadErr> {
        let output = assembler::assemble(source)?;
        self.load(&output.machine_code)?;

        Ok(output)
    }

    /// Back to the initial running state: registers, flags and the program
    /// counter are zeroed. ROM and RAM are kept.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.halted = false;
        self.current_instruction = None;
        self.reset_state();

        debug!("Reset");
    }

    /// Clears registers and flags only, what the `RST` instruction does.
    pub(crate) fn reset_state(&mut self) {
        self.reg_file.clear();
        self.alu.flags = ALUFlags::empty();
        self.busy = false;
    }

    pub fn input(&mut self, value: u32) {
        *self.reg_file.register_mut(Register::INPUT) = (value % MAX_INT as u32) as Word;
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn rom(&self) -> &[Word] {
        &self.rom
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn register(&self, register: Register) -> Word {
        self.reg_file.register(register)
    }

    pub fn registers(&self) -> [Word; REGISTER_COUNT] {
        self.reg_file.array()
    }

    pub fn flags(&self) -> ALUFlags {
        self.alu.flags
    }

    pub fn negative_flag(&self) -> bool {
        self.alu.flags.contains(ALUFlags::NEGATIVE)
    }

    pub fn zero_flag(&self) -> bool {
        self.alu.flags.contains(ALUFlags::ZERO)
    }

    pub fn overflow_flag(&self) -> bool {
        self.alu.flags.contains(ALUFlags::OVERFLOW)
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Raised while a heavy instruction (stack or seven segment) runs.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.current_instruction.as_ref()
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Emulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let general: Vec<_> = self
            .reg_file
            .general
            .iter()
            .map(|value| format!("0x{:02X}", value))
            .collect();
        let input = self.register(Register::INPUT);

        writeln!(f, "PROGRAM COUNTER: 0x{:X}", self.pc)?;
        writeln!(f, "REGISTERS: [{}]", general.join(", "))?;
        write!(f, "INPUT: 0x{:X} ({})", input, input)
    }
}
