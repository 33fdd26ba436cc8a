use std::env;
use std::io::{self, Write};

use tracing::warn;

use crate::core::commands::{run_literal, CommandError, Escapes};
use crate::core::env::EnvVarManager;
use crate::input::History;
use crate::process::{JobRegistry, StdStreams};

/// Everything a command handler may read or change.
///
/// Owned by the driver loop and handed to each handler by `&mut`. The job
/// registry is the only part shared with another thread.
pub struct ShellState {
    pub(crate) current_dir: String,
    pub(crate) running: bool,
    pub(crate) env: EnvVarManager,
    pub(crate) jobs: JobRegistry,
    pub(crate) history: History,
    pub(crate) streams: StdStreams,
    pub(crate) out: Box<dyn Write>,
    pub(crate) escapes: Escapes,
}

impl ShellState {
    pub fn new(
        env: EnvVarManager,
        history: History,
        jobs: JobRegistry,
    ) -> Result<Self, CommandError> {
        let mut state = Self {
            current_dir: String::new(),
            running: true,
            env,
            jobs,
            history,
            streams: StdStreams::inherit(),
            out: Box::new(io::stdout()),
            escapes: Escapes::default(),
        };
        state.sync_current_dir()?;
        Ok(state)
    }

    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    pub fn with_streams(mut self, streams: StdStreams) -> Self {
        self.streams = streams;
        self
    }

    pub fn with_escapes(mut self, escapes: Escapes) -> Self {
        self.escapes = escapes;
        self
    }

    /// Record a line typed by the user and run it.
    ///
    /// Blank lines are ignored. Everything else goes into history before it
    /// is dispatched, so `replay 1` always means "the line before this one".
    pub fn accept_line(&mut self, line: &str) -> Result<(), CommandError> {
        if line.trim().is_empty() {
            return Ok(());
        }

        if let Err(e) = self.history.add(line) {
            warn!(error = %e, "could not persist history entry");
        }
        run_literal(self, line, 0)
    }

    /// Re-read the OS working directory into the session and `PWD`.
    pub fn sync_current_dir(&mut self) -> Result<(), CommandError> {
        let dir = env::current_dir()?.to_string_lossy().into_owned();
        self.env.set("PWD", &dir)?;
        self.current_dir = dir;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    pub fn env(&self) -> &EnvVarManager {
        &self.env
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn jobs(&self) -> &JobRegistry {
        &self.jobs
    }

    pub fn out(&mut self) -> &mut dyn Write {
        self.out.as_mut()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::test_state;

    #[test]
    fn test_new_state_tracks_cwd() {
        let (state, _out) = test_state();
        assert!(state.is_running());
        assert_eq!(state.env().get("PWD"), Some(state.current_dir()));
    }

    #[test]
    fn test_blank_lines_are_not_recorded() {
        let (mut state, out) = test_state();
        state.accept_line("").unwrap();
        state.accept_line(" \t ").unwrap();
        assert!(state.history().is_empty());
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_lines_are_recorded_before_dispatch() {
        let (mut state, _out) = test_state();
        // fails to parse, but is still history
        assert!(state.accept_line("nonsense").is_err());
        state.accept_line("whereami").unwrap();
        assert_eq!(state.history().get(0), Some("whereami"));
        assert_eq!(state.history().get(1), Some("nonsense"));
    }
}
