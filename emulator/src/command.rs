use std::{
    error::Error,
    io::{self, Write},
    str::FromStr,
};

use anyhow::anyhow;
use log::warn;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    // Not thrown directly by the arg reader
    #[error("Unknown command {0}")]
    UnknownCommand(String),

    #[error("Missing argument {0}")]
    MissingArgument(usize),

    #[error("Bad argument {0} ({1})")]
    ParseError(usize, String),
}

pub struct Command(String);

impl Command {
    /// Reads the next command line. `None` once stdin is exhausted.
    pub fn prompt() -> anyhow::Result<Option<Self>> {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = io::stdin().lines().next() else {
            return Ok(None);
        };

        let line = line.map_err(|e| anyhow!("Couldn't read command from stdin: {}", e))?;

        Ok(Some(Self(line)))
    }

    pub fn args(&self) -> CommandArgs<impl Iterator<Item = &str>> {
        CommandArgs {
            iter: self.0.split_whitespace(),
            index: 0,
        }
    }
}

pub struct CommandArgs<I> {
    iter: I,
    index: usize,
}

impl<'a, I> CommandArgs<I>
where
    I: Iterator<Item = &'a str>,
{
    pub fn next(&mut self) -> Result<&'a str, CommandError> {
        self.index += 1;

        self.iter
            .next()
            .ok_or(CommandError::MissingArgument(self.index))
    }

    pub fn next_parsed<T>(&mut self) -> Result<T, CommandError>
    where
        T: FromStr,
        <T as FromStr>::Err: Error + 'static,
    {
        let arg_str = self.next()?;

        T::from_str(arg_str).map_err(|e| CommandError::ParseError(self.index, e.to_string()))
    }

    /// Like [`Self::next_parsed`], but a missing argument falls back to `default`.
    pub fn next_parsed_or<T>(&mut self, default: T) -> Result<T, CommandError>
    where
        T: FromStr,
        <T as FromStr>::Err: Error + 'static,
    {
        match self.next_parsed() {
            Err(CommandError::MissingArgument(_)) => Ok(default),
            result => result,
        }
    }

    pub fn rest_parsed<T>(&mut self) -> Result<Vec<T>, CommandError>
    where
        T: FromStr,
        <T as FromStr>::Err: Error + 'static,
    {
        let mut values = Vec::new();

        loop {
            match self.next_parsed() {
                Ok(value) => values.push(value),
                Err(CommandError::MissingArgument(_)) => return Ok(values),
                Err(e) => return Err(e),
            }
        }
    }

    pub fn finish(self) {
        let unused_arg_count = self.iter.count();

        if unused_arg_count != 0 {
            warn!("{} unused command arguments", unused_arg_count);
        }
    }
}
