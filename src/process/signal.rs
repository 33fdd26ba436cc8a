use std::fmt;
use std::io;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    NotFound,
    PermissionDenied,
    InvalidPid,
    Other(i32),
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalError::NotFound => write!(f, "no such process"),
            SignalError::PermissionDenied => write!(f, "permission denied"),
            SignalError::InvalidPid => write!(f, "invalid pid"),
            SignalError::Other(errno) => write!(f, "kill failed (errno {})", errno),
        }
    }
}

impl std::error::Error for SignalError {}

/// Send SIGTERM to a single process.
///
/// Zero and anything that does not fit a positive `pid_t` is refused, since
/// `kill(2)` would read those as "my group" or "everyone".
pub fn terminate_process(pid: u32) -> Result<(), SignalError> {
    let raw = match libc::pid_t::try_from(pid) {
        Ok(raw) if raw > 0 => raw,
        _ => return Err(SignalError::InvalidPid),
    };

    let rc = unsafe { libc::kill(raw, libc::SIGTERM) };
    if rc == 0 {
        debug!(pid, "sent SIGTERM");
        return Ok(());
    }

    let errno = io::Error::last_os_error().raw_os_error().unwrap_or(0);
    Err(match errno {
        libc::ESRCH => SignalError::NotFound,
        libc::EPERM => SignalError::PermissionDenied,
        other => SignalError::Other(other),
    })
}
