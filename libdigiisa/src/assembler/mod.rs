//! Two-pass text assembler.
//!
//! Source is split into statements (one per line, or separated by `;`), each a
//! list of whitespace separated tokens. The first pass records label offsets,
//! the second resolves every remaining token to a byte.

use std::collections::HashMap;

use log::{debug, trace};
use thiserror::Error;

use crate::{
    instruction::kind::InstructionKind, literal::parse_literal, Register, Word, ROM_SIZE,
};


pub const COMMENT: char = '#';
pub const STATEMENT_SEPARATOR: char = ';';
pub const NOP_ALIAS: &str = "...";
pub const LABEL_DIRECTIVE: &str = "LABEL";
pub const CONST_DIRECTIVE: &str = "CONST";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("Unknown instruction '{0}'")]
    UnknownInstruction(String),

    #[error("Integer {0} outside of byte range")]
    IntegerOverflow(i64),

    #[error("Program of {0} bytes doesn't fit into ROM (max size {max})", max = ROM_SIZE)]
    RomTooLarge(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyOutput {
    pub machine_code: Vec<Word>,

    /// Label name to byte offset in the machine code.
    pub labels: HashMap<String, usize>,
}

type Statement = Vec<String>;

pub fn assemble(source: &str) -> Result<AssemblyOutput, AssemblyError> {
    let statements = statements(source);
    let statements = expand_constants(statements);

    let statements: Vec<_> = statements
        .into_iter()
        .map(|statement| statement.into_iter().map(|token| token.to_uppercase()).collect())
        .map(expand_legacy_immediate)
        .collect();

    let labels = collect_labels(&statements);

    let machine_code = statements
        .iter()
        .filter(|statement| directive(statement).is_none())
        .flatten()
        .map(|token| resolve_token(token, &labels))
        .collect::<Result<Vec<_>, _>>()?;

    if machine_code.len() > ROM_SIZE {
        return Err(AssemblyError::RomTooLarge(machine_code.len()));
    }

    debug!(
        "Assembled {} bytes with {} labels",
        machine_code.len(),
        labels.len()
    );

    Ok(AssemblyOutput {
        machine_code,
        labels,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive<'a> {
    Label(&'a str),
    Const,
}

fn directive(statement: &[String]) -> Option<Directive<'_>> {
    match statement {
        [keyword, name, ..] if keyword.eq_ignore_ascii_case(LABEL_DIRECTIVE) => {
            // The trailing colon in `LABEL LOOP:` is optional.
            let name = name.split(':').next().unwrap_or_default();
            (!name.is_empty()).then_some(Directive::Label(name))
        }
        [keyword, _, _, ..] if keyword.eq_ignore_ascii_case(CONST_DIRECTIVE) => {
            Some(Directive::Const)
        }
        _ => None,
    }
}

/// Strips comments, splits on statement separators and tokenizes. Empty
/// statements are dropped.
fn statements(source: &str) -> Vec<Statement> {
    source
        .lines()
        .map(|line| line.split(COMMENT).next().unwrap_or_default())
        .flat_map(|line| line.split(STATEMENT_SEPARATOR))
        .map(|statement| {
            statement
                .split_whitespace()
                .map(|token| match token {
                    NOP_ALIAS => InstructionKind::Nop.mnemonic().to_string(),
                    token => token.to_string(),
                })
                .collect::<Statement>()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}

/// `CONST <name> <value...>` defines a macro replacing every token exactly
/// equal to `name` with the value tokens. Names are case sensitive since this
/// runs before uppercasing. Later definitions win.
fn expand_constants(statements: Vec<Statement>) -> Vec<Statement> {
    let constants: HashMap<String, Statement> = statements
        .iter()
        .filter(|statement| directive(statement) == Some(Directive::Const))
        .map(|statement| (statement[1].clone(), statement[2..].to_vec()))
        .collect();

    for (name, value) in &constants {
        trace!("Constant {} = {}", name, value.join(" "));
    }

    if constants.is_empty() {
        return statements;
    }

    statements
        .into_iter()
        .map(|statement| {
            if directive(&statement) == Some(Directive::Const) {
                return statement;
            }

            statement
                .into_iter()
                .flat_map(|token| match constants.get(&token) {
                    Some(value) => value.clone(),
                    None => vec![token],
                })
                .collect()
        })
        .collect()
}

/// Older programs wrote `IMM <value>` which always targeted register 0.
fn expand_legacy_immediate(mut statement: Statement) -> Statement {
    if statement.len() == 2 && statement[0] == InstructionKind::Imm.mnemonic() {
        statement.push("0".to_string());
    }

    statement
}

/// First pass: a label takes the offset of the next instruction. Every other
/// statement advances the offset by the width of the first opcode whose
/// mnemonic it starts with.
fn collect_labels(statements: &[Statement]) -> HashMap<String, usize> {
    let mut labels = HashMap::new();
    let mut offset = 0;

    for statement in statements {
        match directive(statement) {
            Some(Directive::Label(name)) => {
                trace!("Label {} at {}", name, offset);
                labels.insert(name.to_string(), offset);
            }
            Some(Directive::Const) => {}
            None => {
                let head = &statement[0];

                if let Some(kind) =
                    InstructionKind::iter().find(|kind| head.starts_with(kind.mnemonic()))
                {
                    offset += kind.width();
                }
            }
        }
    }

    labels
}

/// Second pass resolution order: opcode mnemonic, register alias, label, literal.
fn resolve_token(token: &str, labels: &HashMap<String, usize>) -> Result<Word, AssemblyError> {
    if let Some(kind) = InstructionKind::from_mnemonic(token) {
        return Ok(kind.opcode());
    }

    if let Some(register) = Register::from_alias(token) {
        return Ok(register.index() as Word);
    }

    let value = match labels.get(token) {
        Some(offset) => *offset as i64,
        None => parse_literal(token)
            .ok_or_else(|| AssemblyError::UnknownInstruction(token.to_string()))?,
    };

    Word::try_from(value).map_err(|_| AssemblyError::IntegerOverflow(value))
}
