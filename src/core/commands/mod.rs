use std::fmt;

mod dir;
mod history;
mod jobs;
pub mod parser;
mod session;
mod set;
pub mod table;

pub use parser::{parse, Escapes, ParseError, ParsedCommand, MAX_ARGS, MAX_ARG_LEN};
pub use table::{lookup, names, CommandDescriptor, CommandKind, Usage, COMMANDS};

use tracing::debug;

use crate::core::env::{expand_env_vars, EnvError};
use crate::core::state::ShellState;
use crate::path::PathError;
use crate::process::{LaunchError, ProcessError, SignalError};

/// How deep a chain of `replay` commands may nest before it is cut off.
pub const MAX_REPLAY_DEPTH: usize = 16;

#[derive(Debug)]
pub enum CommandError {
    Parse(ParseError),
    Usage(Usage),
    InvalidArguments(String),
    Launch(LaunchError),
    Signal { pid: u32, error: SignalError },
    HistoryDepthExceeded(usize),
    ReplayRecursionExceeded(usize),
    EnvError(EnvError),
    PathError(PathError),
    ProcessError(ProcessError),
    IoError(std::io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Parse(err) => write!(f, "{}", err),
            CommandError::Usage(usage) => write!(f, "usage: {}", usage.synopsis),
            CommandError::InvalidArguments(msg) => write!(f, "invalid arguments: {}", msg),
            CommandError::Launch(err) => write!(f, "{}", err),
            CommandError::Signal { pid, error } => write!(f, "{}: {}", pid, error),
            CommandError::HistoryDepthExceeded(n) => {
                write!(f, "history does not reach back {} commands", n)
            }
            CommandError::ReplayRecursionExceeded(max) => {
                write!(f, "replay nested deeper than {} levels", max)
            }
            CommandError::EnvError(err) => write!(f, "{}", err),
            CommandError::PathError(err) => write!(f, "{}", err),
            CommandError::ProcessError(err) => write!(f, "Process error: {}", err),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<ParseError> for CommandError {
    fn from(err: ParseError) -> Self {
        CommandError::Parse(err)
    }
}

impl From<LaunchError> for CommandError {
    fn from(err: LaunchError) -> Self {
        CommandError::Launch(err)
    }
}

impl From<EnvError> for CommandError {
    fn from(err: EnvError) -> Self {
        CommandError::EnvError(err)
    }
}

impl From<PathError> for CommandError {
    fn from(err: PathError) -> Self {
        CommandError::PathError(err)
    }
}

impl From<ProcessError> for CommandError {
    fn from(err: ProcessError) -> Self {
        CommandError::ProcessError(err)
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

/// Expand, tokenize and run one literal command line.
///
/// `depth` counts how many `replay` commands led here; live input runs at 0.
pub fn run_literal(state: &mut ShellState, line: &str, depth: usize) -> Result<(), CommandError> {
    let expanded = expand_env_vars(line, &state.env)?;
    let parsed = parse(&expanded, state.escapes)?;
    debug!(
        command = parsed.descriptor.name,
        argc = parsed.argc(),
        depth,
        "dispatching"
    );
    dispatch(state, parsed.descriptor.kind, &parsed.argv, depth)
}

fn dispatch(
    state: &mut ShellState,
    kind: CommandKind,
    argv: &[String],
    depth: usize,
) -> Result<(), CommandError> {
    match kind {
        CommandKind::MoveToDir => dir::movetodir(state, argv),
        CommandKind::WhereAmI => dir::whereami(state, argv),
        CommandKind::History => history::history(state, argv),
        CommandKind::ByeBye => session::byebye(state, argv),
        CommandKind::Replay => history::replay(state, argv, depth),
        CommandKind::Repeat => jobs::repeat(state, argv),
        CommandKind::Start => jobs::start(state, argv),
        CommandKind::Background => jobs::background(state, argv),
        CommandKind::Dalek => jobs::dalek(state, argv),
        CommandKind::DalekAll => jobs::dalekall(state, argv),
        CommandKind::ListBackground => jobs::lsbg(state, argv),
        CommandKind::Set => set::set(state, argv),
        CommandKind::Help => session::help(state, argv),
    }
}
