use std::collections::HashMap;

use libdigiisa::{
    instruction::{DecodeError, Instruction},
    Word,
};


/// One decoded position of a listing.
pub type Decoded = (usize, Result<Instruction, DecodeError>);

/// Walks machine code instruction by instruction. An undecodable byte is
/// reported and skipped on its own, so decoding always makes progress.
pub struct Deassembler<'a> {
    code: &'a [Word],
    pos: usize,
}

impl<'a> Deassembler<'a> {
    pub fn new(code: &'a [Word]) -> Self {
        Self { code, pos: 0 }
    }

    /// Drops the zero padding a ROM dump ends with. Zero is `NOP`, so this
    /// only shortens the listing.
    pub fn trimmed(code: &'a [Word]) -> Self {
        let len = code.iter().rposition(|&byte| byte != 0).map_or(0, |last| last + 1);

        Self::new(&code[..len])
    }

    pub fn deassemble(self) -> Vec<Decoded> {
        self.collect()
    }

    /// Listing with one `OO: MNEMONIC XX YY` line per instruction, preceded by
    /// `LABEL name` lines for the labels pointing at it.
    pub fn deassemble_text(self, labels: &HashMap<String, usize>) -> String {
        let mut by_offset: HashMap<usize, Vec<&str>> = HashMap::new();
        for (name, offset) in labels {
            by_offset.entry(*offset).or_default().push(name);
        }
        for names in by_offset.values_mut() {
            names.sort_unstable();
        }

        let mut output = String::new();

        for (offset, decoded) in self {
            for name in by_offset.get(&offset).into_iter().flatten() {
                output += &format!("LABEL {}\n", name);
            }

            output += &format!("{:02X}: {}\n", offset, instruction_text(&decoded));
        }

        output
    }

    pub fn deassemble_instruction(&mut self) -> Option<Decoded> {
        if self.pos >= self.code.len() {
            return None;
        }

        let offset = self.pos;
        let decoded = Instruction::decode_at(self.code, offset);

        self.pos += match &decoded {
            Ok(instruction) => instruction.width(),
            Err(_) => 1,
        };

        Some((offset, decoded))
    }
}

impl Iterator for Deassembler<'_> {
    type Item = Decoded;

    fn next(&mut self) -> Option<Self::Item> {
        self.deassemble_instruction()
    }
}

pub fn instruction_text(decoded: &Result<Instruction, DecodeError>) -> String {
    match decoded {
        Ok(instruction) => instruction.to_string(),
        Err(DecodeError::UnknownOpcode(opcode)) => format!("<unknown opcode {:02X}>", opcode),
        Err(e) => format!("<{}>", e),
    }
}
