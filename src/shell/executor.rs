use std::io::{self, Write};
use std::sync::mpsc::Receiver;

use crate::core::commands::CommandError;
use crate::core::ShellState;
use crate::error::ShellError;
use crate::highlight::SyntaxHighlighter;
use crate::process::JobEvent;

pub(crate) trait CommandHandler {
    /// Run one input line. Command failures are reported and swallowed.
    fn execute_command(&mut self, line: &str) -> Result<(), ShellError>;

    /// Print a notice for every background job reaped since the last prompt.
    fn report_jobs(&mut self) -> Result<(), ShellError>;
}

impl CommandHandler for super::Shell {
    fn execute_command(&mut self, line: &str) -> Result<(), ShellError> {
        let result = self.state.accept_line(line);
        report_result(&mut self.state, &self.highlighter, result)?;
        Ok(())
    }

    fn report_jobs(&mut self) -> Result<(), ShellError> {
        let quiet = self.flags.is_set("quiet");
        drain_job_events(&self.job_events, self.state.out(), &self.highlighter, quiet)?;
        Ok(())
    }
}

pub(crate) fn report_result(
    state: &mut ShellState,
    highlighter: &SyntaxHighlighter,
    result: Result<(), CommandError>,
) -> io::Result<()> {
    if let Err(e) = result {
        let out = state.out();
        writeln!(out, "{}", highlighter.highlight_error(&e.to_string()))?;
        out.flush()?;
    }
    Ok(())
}

pub(crate) fn drain_job_events(
    events: &Receiver<JobEvent>,
    out: &mut dyn Write,
    highlighter: &SyntaxHighlighter,
    quiet: bool,
) -> io::Result<()> {
    for event in events.try_iter() {
        let JobEvent::Reaped { pid, state } = event;
        if !quiet {
            let notice = format!("[{}] done ({})", pid, state);
            writeln!(out, "{}", highlighter.highlight_notice(&notice))?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::testing::test_state;
    use crate::process::ExitState;
    use std::sync::mpsc;

    #[test]
    fn test_errors_are_printed_not_raised() {
        let (mut state, out) = test_state();
        let highlighter = SyntaxHighlighter::plain();

        let result = state.accept_line("frobnicate");
        report_result(&mut state, &highlighter, result).unwrap();
        assert_eq!(out.contents(), "frobnicate: command not found\n");

        out.clear();
        let result = state.accept_line("whereami");
        report_result(&mut state, &highlighter, result).unwrap();
        assert_eq!(out.contents(), format!("{}\n", state.current_dir()));
    }

    #[test]
    fn test_job_notices() {
        let (tx, rx) = mpsc::channel();
        tx.send(JobEvent::Reaped {
            pid: 41,
            state: ExitState::Exited(0),
        })
        .unwrap();
        tx.send(JobEvent::Reaped {
            pid: 42,
            state: ExitState::Signaled(15),
        })
        .unwrap();

        let mut out = Vec::new();
        drain_job_events(&rx, &mut out, &SyntaxHighlighter::plain(), false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[41] done (exit 0)\n[42] done (signal 15)\n"
        );

        tx.send(JobEvent::Reaped {
            pid: 43,
            state: ExitState::Gone,
        })
        .unwrap();
        let mut out = Vec::new();
        drain_job_events(&rx, &mut out, &SyntaxHighlighter::plain(), true).unwrap();
        assert!(out.is_empty());
        assert!(rx.try_recv().is_err());
    }
}
