use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use signal_hook::consts::SIGCHLD;
use signal_hook::iterator::{Handle, Signals};
use tracing::{debug, warn};

use super::registry::{ExitState, JobRegistry};
use super::ProcessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent {
    Reaped { pid: u32, state: ExitState },
}

/// Background thread that collects finished background jobs.
///
/// SIGCHLD is turned into an iterator by signal-hook, so the actual
/// `waitpid` calls and the registry lock happen on an ordinary thread rather
/// than inside a signal handler.
pub struct Reaper {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl Reaper {
    pub fn spawn(registry: JobRegistry, events: Sender<JobEvent>) -> Result<Self, ProcessError> {
        let mut signals = Signals::new([SIGCHLD]).map_err(ProcessError::SignalSetup)?;
        let handle = signals.handle();

        let thread = thread::Builder::new()
            .name("shelly-reaper".to_string())
            .spawn(move || {
                // several children can exit between two wakeups; each pass
                // drains every one that is finished
                for _ in signals.forever() {
                    let reaped = match registry.reap_finished() {
                        Ok(reaped) => reaped,
                        Err(e) => {
                            warn!(error = %e, "reaper giving up");
                            break;
                        }
                    };
                    for (pid, state) in reaped {
                        // the shell may already be gone
                        let _ = events.send(JobEvent::Reaped { pid, state });
                    }
                }
                debug!("reaper stopped");
            })
            .map_err(ProcessError::SignalSetup)?;

        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    pub fn shutdown(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("reaper thread panicked");
            }
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{launch, LaunchMode, ProcessGroup, StdStreams};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_sigchld_reaps_background_job() {
        let registry = JobRegistry::new();
        let (tx, rx) = mpsc::channel();
        let mut reaper = Reaper::spawn(registry.clone(), tx).unwrap();

        let pid = registry
            .track_with(|| -> Result<u32, ProcessError> {
                let launched = launch(
                    "true",
                    &[],
                    ProcessGroup::Leader,
                    &StdStreams::null(),
                    std::env::vars(),
                    LaunchMode::Background,
                )
                .map_err(|e| ProcessError::Other(e.to_string()))?;
                launched
                    .pid()
                    .ok_or_else(|| ProcessError::Other("no pid".to_string()))
            })
            .unwrap();

        let event = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(
            event,
            JobEvent::Reaped {
                pid,
                state: ExitState::Exited(0)
            }
        );
        assert!(!registry.contains(pid).unwrap());

        reaper.shutdown();
    }
}
