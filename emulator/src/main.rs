use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use command::{Command, CommandError};
use libdeassembler::Deassembler;
use libdigiisa::{Register, Word, RAM_SIZE};
use libemulator::{Emulator, ExecuteOk};
use log::info;

mod command;

const DEFAULT_RUN_LIMIT: usize = 10_000;
const DEFAULT_DUMP_WIDTH: usize = 16;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Assembly source, or a raw ROM image with `--binary`.
    program: PathBuf,

    /// Load the program file as a raw ROM image instead of assembling it.
    #[arg(short, long)]
    binary: bool,

    /// Run for at most this many steps, print the state and exit.
    #[arg(short, long)]
    steps: Option<usize>,

    /// Initial value of the input register, reduced mod 256.
    #[arg(short, long)]
    input: Option<u32>,

    /// Write the loaded ROM image to this path.
    #[arg(short, long)]
    dump_rom: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut emulator = Emulator::new();

    let labels = if args.binary {
        let rom = fs::read(&args.program)
            .with_context(|| format!("Failed to read ROM image {}", args.program.display()))?;
        emulator.load(&rom)?;

        HashMap::new()
    } else {
        let source = fs::read_to_string(&args.program)
            .with_context(|| format!("Failed to read program {}", args.program.display()))?;

        emulator.load_string(&source)?.labels
    };

    if let Some(path) = &args.dump_rom {
        fs::write(path, emulator.rom())
            .with_context(|| format!("Failed to write ROM image {}", path.display()))?;
        info!("Wrote ROM image to {}", path.display());
    }

    if let Some(value) = args.input {
        emulator.input(value);
    }

    match args.steps {
        Some(limit) => {
            let executed = emulator.execute_to_halt(limit)?;

            println!("Executed {} instructions", executed);
            println!("{}", emulator);
        }
        None => emulate(&mut emulator, &labels)?,
    }

    Ok(())
}

fn emulate(emulator: &mut Emulator, labels: &HashMap<String, usize>) -> anyhow::Result<()> {
    loop {
        println!("{}", emulator);

        let Some(command) = Command::prompt()? else {
            return Ok(());
        };

        match execute_command(&command, emulator, labels) {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => eprintln!("!> {}", e),
        }
    }
}

/// Returns whether the REPL should quit.
fn execute_command(
    command: &Command,
    emulator: &mut Emulator,
    labels: &HashMap<String, usize>,
) -> anyhow::Result<bool> {
    let mut args = command.args();

    let name = match args.next() {
        Ok(name) => name,
        Err(_) => return Ok(false),
    };

    match name {
        "s" => {
            let count: usize = args.next_parsed_or(1)?;

            for _ in 0..count {
                let result = emulator.step()?;

                if let Some(instruction) = emulator.current_instruction() {
                    println!("{}", instruction);
                }

                if result == ExecuteOk::Halted {
                    println!("Halted");
                    break;
                }
            }
        }
        "r" => {
            let limit = args.next_parsed_or(DEFAULT_RUN_LIMIT)?;
            let executed = emulator.execute_to_halt(limit)?;

            println!("Executed {} instructions", executed);
            if !emulator.is_halted() {
                println!("Didn't halt by {} executed instructions", limit);
            }
        }
        "i" => {
            let value = args.next_parsed()?;
            emulator.input(value);
        }
        "reset" => emulator.reset(),
        "regs" => {
            for register in Register::all() {
                let value = emulator.register(register);
                println!("{:>5}: 0x{:02X} ({})", register.to_string(), value, value);
            }

            println!("FLAGS: {:?}", emulator.flags());
        }
        "ram" => {
            let start = args.next_parsed_or(0)?;
            let len = args.next_parsed_or(DEFAULT_DUMP_WIDTH.min(RAM_SIZE.saturating_sub(start)))?;

            let dump: Vec<_> = emulator
                .memory()
                .read(start, len)?
                .iter()
                .map(|value| format!("{:02X}", value))
                .collect();

            println!("{:02X}: {}", start, dump.join(" "));
        }
        "poke" => {
            let start = args.next_parsed()?;
            let data: Vec<Word> = args.rest_parsed()?;

            emulator.memory_mut().write(start, &data)?;
        }
        "l" => {
            let listing = Deassembler::trimmed(emulator.rom()).deassemble_text(labels);
            print!("{}", listing);
        }
        "q" => return Ok(true),
        _ => Err(CommandError::UnknownCommand(name.to_string()))?,
    }

    args.finish();

    Ok(false)
}
