use std::fmt;

pub mod launcher;
pub mod reaper;
pub mod registry;
pub mod signal;

pub use launcher::{
    launch, ExecFailure, LaunchError, LaunchMode, Launched, ProcessGroup, StdStreams,
    StreamHandle,
};
pub use reaper::{JobEvent, Reaper};
pub use registry::{ExitState, JobRegistry};
pub use signal::SignalError;

#[derive(Debug)]
pub enum ProcessError {
    LockPoisoned(&'static str),
    SignalSetup(std::io::Error),
    Other(String),
}

impl From<std::io::Error> for ProcessError {
    fn from(e: std::io::Error) -> Self {
        ProcessError::Other(e.to_string())
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::LockPoisoned(what) => write!(f, "{} lock poisoned", what),
            ProcessError::SignalSetup(e) => write!(f, "Failed to watch SIGCHLD: {}", e),
            ProcessError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}
