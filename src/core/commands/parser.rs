use std::fmt;

use super::table::{lookup, CommandDescriptor};

pub const MAX_ARGS: usize = 64;
pub const MAX_ARG_LEN: usize = 1024;

/// Characters the tokenizer decodes into a literal `$` and a literal space,
/// so one argument can carry either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escapes {
    pub dollar: char,
    pub space: char,
}

impl Default for Escapes {
    fn default() -> Self {
        Self {
            dollar: '%',
            space: '^',
        }
    }
}

impl Escapes {
    pub fn validate(&self) -> Result<(), &'static str> {
        for c in [self.dollar, self.space] {
            if !is_allowed(c) {
                return Err("escape characters must be printable ASCII");
            }
            if c == '$' {
                return Err("'$' cannot be an escape character");
            }
        }
        if self.dollar == self.space {
            return Err("escape characters must differ");
        }
        Ok(())
    }

    fn decode(&self, c: char) -> char {
        if c == self.dollar {
            '$'
        } else if c == self.space {
            ' '
        } else {
            c
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    EmptyLine,
    InvalidCharacter(char),
    UnknownCommand(String),
    TooManyArguments { max: usize },
    ArgumentTooLong { index: usize, max: usize },
    LineTooLong { len: usize, max: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyLine => write!(f, "empty command"),
            ParseError::InvalidCharacter(c) => write!(f, "invalid character {:?}", c),
            ParseError::UnknownCommand(name) => write!(f, "{}: command not found", name),
            ParseError::TooManyArguments { max } => write!(f, "too many arguments (max {})", max),
            ParseError::ArgumentTooLong { index, max } => {
                write!(f, "argument {} is longer than {} bytes", index, max)
            }
            ParseError::LineTooLong { len, max } => {
                write!(f, "command is {} bytes, the limit is {}", len, max)
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    pub descriptor: &'static CommandDescriptor,
    pub argv: Vec<String>,
}

impl ParsedCommand {
    pub fn argc(&self) -> usize {
        self.argv.len()
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_allowed(c: char) -> bool {
    ('!'..='~').contains(&c)
}

/// Split one preprocessed line into an argument vector.
///
/// Scanning stops at the end of the string, a newline or a NUL. The command
/// name is resolved as soon as it is complete; an unknown name ends the parse
/// before the rest of the line is looked at.
pub fn parse(line: &str, escapes: Escapes) -> Result<ParsedCommand, ParseError> {
    let mut argv: Vec<String> = Vec::new();
    let mut descriptor = None;
    let mut current = String::new();
    let mut in_arg = false;

    for c in line.chars().chain(std::iter::once('\0')) {
        let at_end = c == '\0' || c == '\n';

        if at_end || is_whitespace(c) {
            if in_arg {
                if argv.is_empty() {
                    let found = lookup(&current)
                        .ok_or_else(|| ParseError::UnknownCommand(current.clone()))?;
                    descriptor = Some(found);
                }
                argv.push(std::mem::take(&mut current));
                in_arg = false;
            }
            if at_end {
                break;
            }
        } else if is_allowed(c) {
            if !in_arg && argv.len() == MAX_ARGS {
                return Err(ParseError::TooManyArguments { max: MAX_ARGS });
            }
            current.push(escapes.decode(c));
            in_arg = true;
            if current.len() > MAX_ARG_LEN {
                return Err(ParseError::ArgumentTooLong {
                    index: argv.len(),
                    max: MAX_ARG_LEN,
                });
            }
        } else {
            return Err(ParseError::InvalidCharacter(c));
        }
    }

    let descriptor = descriptor.ok_or(ParseError::EmptyLine)?;
    Ok(ParsedCommand { descriptor, argv })
}
