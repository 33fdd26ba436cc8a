use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use rustyline::{config::Configurer, error::ReadlineError, history::FileHistory, Editor};
use tracing::{debug, warn};

mod environment;
mod executor;

use crate::{
    core::{config::Config, env::EnvVarManager, ShellState},
    error::ShellError,
    flags::Flags,
    highlight::SyntaxHighlighter,
    input::{History, ShellHelper},
    process::{JobEvent, JobRegistry, Reaper},
};

use environment::EnvironmentHandler;
use executor::CommandHandler;

/// The interactive session: line editor, session state and the reaper.
pub struct Shell {
    pub(crate) editor: Editor<ShellHelper, FileHistory>,
    pub(crate) state: ShellState,
    pub(crate) config: Config,
    pub(crate) flags: Flags,
    pub(crate) highlighter: SyntaxHighlighter,
    pub(crate) reaper: Reaper,
    pub(crate) job_events: Receiver<JobEvent>,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let rc_override = flags.get_value("config").map(PathBuf::from);
        let mut config = Config::new(rc_override)?;
        let mut env = EnvVarManager::from_process();
        config.load(&mut env)?;

        let history = match History::with_file(config.history_file().to_path_buf()) {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "starting with empty history");
                History::new()
            }
        };

        let jobs = JobRegistry::new();
        let (events_tx, job_events) = mpsc::channel();
        let reaper = Reaper::spawn(jobs.clone(), events_tx)?;

        let state = ShellState::new(env, history, jobs)?.with_escapes(config.escapes());

        let highlighter = SyntaxHighlighter::new();
        let mut editor = Editor::<ShellHelper, FileHistory>::new()?;
        editor.set_helper(Some(ShellHelper::new(highlighter)));
        editor.set_auto_add_history(true);

        // ^C must not take the shell down while a foreground job runs
        ctrlc::set_handler(|| {})?;

        debug!(history = %config.history_file().display(), "shell ready");
        Ok(Shell {
            editor,
            state,
            config,
            flags,
            highlighter,
            reaper,
            job_events,
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        while self.state.is_running() {
            self.report_jobs()?;

            let prompt = self.render_prompt();
            match self.editor.readline(&prompt) {
                Ok(line) => self.execute_command(&line)?,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        self.reaper.shutdown();
        Ok(())
    }
}
