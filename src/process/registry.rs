use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::signal::{terminate_process, SignalError};
use super::ProcessError;

/// How a reaped background job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Exited(i32),
    Signaled(i32),
    /// Already collected elsewhere; `waitpid` reported ECHILD.
    Gone,
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitState::Exited(code) => write!(f, "exit {}", code),
            ExitState::Signaled(sig) => write!(f, "signal {}", sig),
            ExitState::Gone => write!(f, "gone"),
        }
    }
}

/// Live background pids, shared between the command handlers and the reaper.
///
/// Every access goes through the one mutex. A pid is in the set from the
/// moment it is spawned until the reaper has collected its exit status.
#[derive(Clone, Default, Debug)]
pub struct JobRegistry {
    jobs: Arc<Mutex<BTreeSet<u32>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeSet<u32>>, ProcessError> {
        self.jobs
            .lock()
            .map_err(|_| ProcessError::LockPoisoned("job registry"))
    }

    /// Returns false when the pid was already tracked.
    pub fn insert(&self, pid: u32) -> Result<bool, ProcessError> {
        Ok(self.lock()?.insert(pid))
    }

    pub fn remove(&self, pid: u32) -> Result<bool, ProcessError> {
        Ok(self.lock()?.remove(&pid))
    }

    pub fn contains(&self, pid: u32) -> Result<bool, ProcessError> {
        Ok(self.lock()?.contains(&pid))
    }

    pub fn len(&self) -> Result<usize, ProcessError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ProcessError> {
        Ok(self.lock()?.is_empty())
    }

    /// Pids in ascending order. Read only.
    pub fn snapshot(&self) -> Result<Vec<u32>, ProcessError> {
        Ok(self.lock()?.iter().copied().collect())
    }

    /// Run `spawn` with the lock held and record the pid it returns.
    ///
    /// The reaper cannot look at the set until the new pid is in it, so a
    /// child that dies instantly is still collected on the next SIGCHLD.
    pub fn track_with<F, E>(&self, spawn: F) -> Result<u32, E>
    where
        F: FnOnce() -> Result<u32, E>,
        E: From<ProcessError>,
    {
        let mut jobs = self.lock()?;
        let pid = spawn()?;
        jobs.insert(pid);
        debug!(pid, live = jobs.len(), "tracking background job");
        Ok(pid)
    }

    /// Run `spawn` up to `count` times under one hold of the lock.
    ///
    /// `spawn` is handed the pids started so far, so later copies can join
    /// the first one's process group. Until the batch is complete the reaper
    /// cannot collect any of them, which keeps an early leader's group alive
    /// as a zombie. The batch stops at the first failure. Pids started before
    /// it stay tracked and are returned with the error.
    pub fn track_batch<F, E>(
        &self,
        count: usize,
        mut spawn: F,
    ) -> Result<(Vec<u32>, Option<E>), ProcessError>
    where
        F: FnMut(&[u32]) -> Result<u32, E>,
    {
        let mut jobs = self.lock()?;
        let mut pids = Vec::with_capacity(count);
        for _ in 0..count {
            match spawn(&pids) {
                Ok(pid) => {
                    jobs.insert(pid);
                    pids.push(pid);
                }
                Err(e) => {
                    debug!(started = pids.len(), count, "batch launch stopped early");
                    return Ok((pids, Some(e)));
                }
            }
        }
        debug!(?pids, live = jobs.len(), "tracking batch");
        Ok((pids, None))
    }

    /// Collect every tracked child that has terminated, without blocking.
    pub fn reap_finished(&self) -> Result<Vec<(u32, ExitState)>, ProcessError> {
        let mut jobs = self.lock()?;
        let mut reaped = Vec::new();

        jobs.retain(|&pid| match poll_exit(pid) {
            Some(state) => {
                reaped.push((pid, state));
                false
            }
            None => true,
        });

        for (pid, state) in &reaped {
            debug!(pid, %state, "reaped background job");
        }
        Ok(reaped)
    }

    /// SIGTERM every tracked job.
    ///
    /// Failures are collected per pid and never stop the sweep. Pids the
    /// kernel no longer knows are dropped; signalled ones stay until reaped.
    pub fn kill_all(&self) -> Result<Vec<(u32, Result<(), SignalError>)>, ProcessError> {
        let mut jobs = self.lock()?;
        let mut results = Vec::with_capacity(jobs.len());

        jobs.retain(|&pid| {
            let result = terminate_process(pid);
            let keep = !matches!(result, Err(SignalError::NotFound));
            results.push((pid, result));
            keep
        });

        Ok(results)
    }
}

fn poll_exit(pid: u32) -> Option<ExitState> {
    let raw = libc::pid_t::try_from(pid).ok()?;
    let mut status: libc::c_int = 0;

    loop {
        let rc = unsafe { libc::waitpid(raw, &mut status, libc::WNOHANG) };
        if rc == raw {
            return Some(decode_status(status));
        }
        if rc == 0 {
            return None;
        }
        match std::io::Error::last_os_error().raw_os_error() {
            Some(libc::EINTR) => continue,
            Some(libc::ECHILD) => return Some(ExitState::Gone),
            _ => return None,
        }
    }
}

fn decode_status(status: libc::c_int) -> ExitState {
    if libc::WIFEXITED(status) {
        ExitState::Exited(libc::WEXITSTATUS(status))
    } else if libc::WIFSIGNALED(status) {
        ExitState::Signaled(libc::WTERMSIG(status))
    } else {
        ExitState::Gone
    }
}
