use std::{collections::HashMap, env, fs, path::PathBuf, process::exit};

use libdeassembler::Deassembler;

fn main() {
    let path: PathBuf = env::args().skip(1).collect();

    if path.file_name().is_none() {
        eprintln!("Specify the ROM dump path as arguments.");
        exit(1);
    }

    let rom = match fs::read(path) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("Error reading ROM dump: {}", e);
            exit(1);
        }
    };

    let deassembler = Deassembler::trimmed(&rom);
    print!("{}", deassembler.deassemble_text(&HashMap::new()));
}
