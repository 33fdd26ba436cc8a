use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

/// Where one of a child's standard streams points.
#[derive(Debug)]
pub enum StreamHandle {
    Inherit,
    Null,
    File(File),
}

impl StreamHandle {
    fn to_stdio(&self) -> io::Result<Stdio> {
        match self {
            StreamHandle::Inherit => Ok(Stdio::inherit()),
            StreamHandle::Null => Ok(Stdio::null()),
            // std files are opened close-on-exec, so only the dup2'd copy
            // survives into the child
            StreamHandle::File(file) => Ok(Stdio::from(file.try_clone()?)),
        }
    }
}

#[derive(Debug)]
pub struct StdStreams {
    pub stdin: StreamHandle,
    pub stdout: StreamHandle,
    pub stderr: StreamHandle,
}

impl Default for StdStreams {
    fn default() -> Self {
        Self::inherit()
    }
}

impl StdStreams {
    pub fn inherit() -> Self {
        Self {
            stdin: StreamHandle::Inherit,
            stdout: StreamHandle::Inherit,
            stderr: StreamHandle::Inherit,
        }
    }

    /// Discard sink used for background jobs.
    pub fn null() -> Self {
        Self {
            stdin: StreamHandle::Null,
            stdout: StreamHandle::Null,
            stderr: StreamHandle::Null,
        }
    }
}

/// Process group the child is placed in before exec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessGroup {
    /// Stay in the shell's group, so terminal signals reach the child.
    Inherit,
    /// New group whose id is the child's own pid (pgid 0).
    Leader,
    Join(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Foreground,
    Background,
}

#[derive(Debug)]
pub enum Launched {
    Finished(ExitStatus),
    Background(u32),
}

impl Launched {
    pub fn success(&self) -> bool {
        match self {
            Launched::Finished(status) => status.success(),
            Launched::Background(_) => true,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        match self {
            Launched::Background(pid) => Some(*pid),
            Launched::Finished(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecFailure {
    AccessDenied,
    IoError,
    NotFound,
    Other(i32),
}

impl fmt::Display for ExecFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecFailure::AccessDenied => write!(f, "access denied"),
            ExecFailure::IoError => write!(f, "I/O error"),
            ExecFailure::NotFound => write!(f, "not found"),
            ExecFailure::Other(0) => write!(f, "could not execute"),
            ExecFailure::Other(errno) => write!(f, "could not execute (errno {})", errno),
        }
    }
}

#[derive(Debug)]
pub enum LaunchError {
    ForkFailed(io::Error),
    ExecFailed { program: String, failure: ExecFailure },
    Stream(io::Error),
    Wait(io::Error),
}

impl LaunchError {
    fn from_spawn(program: &str, err: io::Error) -> Self {
        let failure = match err.raw_os_error() {
            Some(libc::EAGAIN) | Some(libc::ENOMEM) => return LaunchError::ForkFailed(err),
            Some(libc::EACCES) | Some(libc::EPERM) => ExecFailure::AccessDenied,
            Some(libc::EIO) => ExecFailure::IoError,
            Some(libc::ENOENT) | Some(libc::ENOTDIR) => ExecFailure::NotFound,
            Some(errno) => ExecFailure::Other(errno),
            None => match err.kind() {
                io::ErrorKind::NotFound => ExecFailure::NotFound,
                io::ErrorKind::PermissionDenied => ExecFailure::AccessDenied,
                _ => ExecFailure::Other(0),
            },
        };
        LaunchError::ExecFailed {
            program: program.to_string(),
            failure,
        }
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::ForkFailed(e) => write!(f, "fork failed: {}", e),
            LaunchError::ExecFailed { program, failure } => write!(f, "{}: {}", program, failure),
            LaunchError::Stream(e) => write!(f, "could not attach stream: {}", e),
            LaunchError::Wait(e) => write!(f, "wait failed: {}", e),
        }
    }
}

impl std::error::Error for LaunchError {}

fn build_command<I, K, V>(
    program: &str,
    args: &[String],
    group: ProcessGroup,
    streams: &StdStreams,
    env: I,
) -> Result<Command, LaunchError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(streams.stdin.to_stdio().map_err(LaunchError::Stream)?)
        .stdout(streams.stdout.to_stdio().map_err(LaunchError::Stream)?)
        .stderr(streams.stderr.to_stdio().map_err(LaunchError::Stream)?)
        .env_clear()
        .envs(env);

    match group {
        ProcessGroup::Inherit => {}
        ProcessGroup::Leader => {
            command.process_group(0);
        }
        ProcessGroup::Join(pgid) => {
            command.process_group(pgid as i32);
        }
    }
    Ok(command)
}

/// Run `program` and block until that one child exits.
fn run_foreground<I, K, V>(
    program: &str,
    args: &[String],
    group: ProcessGroup,
    streams: &StdStreams,
    env: I,
) -> Result<ExitStatus, LaunchError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut child = build_command(program, args, group, streams, env)?
        .spawn()
        .map_err(|e| LaunchError::from_spawn(program, e))?;
    let pid = child.id();

    debug!(pid, program, "waiting on foreground job");
    let status = child.wait().map_err(LaunchError::Wait)?;
    debug!(pid, %status, "foreground job finished");
    Ok(status)
}

/// Start `program` and return its pid without waiting. Reaping is the
/// caller's job.
fn spawn_background<I, K, V>(
    program: &str,
    args: &[String],
    group: ProcessGroup,
    streams: &StdStreams,
    env: I,
) -> Result<u32, LaunchError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let child = build_command(program, args, group, streams, env)?
        .spawn()
        .map_err(|e| LaunchError::from_spawn(program, e))?;
    let pid = child.id();

    debug!(pid, program, ?group, "launched background job");
    Ok(pid)
}

/// Start `program` with `args`, resolving it against the `PATH` in `env`.
///
/// The child sees exactly `env` as its environment and has `streams` on
/// descriptors 0, 1 and 2.
pub fn launch<I, K, V>(
    program: &str,
    args: &[String],
    group: ProcessGroup,
    streams: &StdStreams,
    env: I,
    mode: LaunchMode,
) -> Result<Launched, LaunchError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    match mode {
        LaunchMode::Foreground => {
            run_foreground(program, args, group, streams, env).map(Launched::Finished)
        }
        LaunchMode::Background => {
            spawn_background(program, args, group, streams, env).map(Launched::Background)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn host_env() -> Vec<(String, String)> {
        std::env::vars().collect()
    }

    fn wait_blocking(pid: u32) {
        let mut status = 0;
        unsafe {
            libc::waitpid(pid as libc::pid_t, &mut status, 0);
        }
    }

    #[test]
    fn test_foreground_success_and_failure() {
        let streams = StdStreams::null();
        let ok = launch(
            "true",
            &[],
            ProcessGroup::Inherit,
            &streams,
            host_env(),
            LaunchMode::Foreground,
        )
        .unwrap();
        assert!(ok.success());
        assert!(ok.pid().is_none());

        let failed = launch(
            "false",
            &[],
            ProcessGroup::Inherit,
            &streams,
            host_env(),
            LaunchMode::Foreground,
        )
        .unwrap();
        assert!(!failed.success());
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let result = launch(
            "shelly-no-such-program",
            &[],
            ProcessGroup::Inherit,
            &StdStreams::null(),
            host_env(),
            LaunchMode::Foreground,
        );
        match result {
            Err(LaunchError::ExecFailed { program, failure }) => {
                assert_eq!(program, "shelly-no-such-program");
                assert_eq!(failure, ExecFailure::NotFound);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_access_denied() {
        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().to_string_lossy().into_owned();
        let result = launch(
            &program,
            &[],
            ProcessGroup::Inherit,
            &StdStreams::null(),
            host_env(),
            LaunchMode::Foreground,
        );
        assert!(matches!(
            result,
            Err(LaunchError::ExecFailed { failure: ExecFailure::AccessDenied, .. })
        ));
    }

    #[test]
    fn test_stdout_is_redirected_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let file = fs::File::create(&path).unwrap();
        let streams = StdStreams {
            stdin: StreamHandle::Null,
            stdout: StreamHandle::File(file),
            stderr: StreamHandle::Null,
        };

        let args = vec!["hello".to_string(), "world".to_string()];
        let launched = launch(
            "echo",
            &args,
            ProcessGroup::Inherit,
            &streams,
            host_env(),
            LaunchMode::Foreground,
        )
        .unwrap();
        assert!(launched.success());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world\n");
    }

    #[test]
    fn test_child_sees_supplied_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.txt");
        let streams = StdStreams {
            stdin: StreamHandle::Null,
            stdout: StreamHandle::File(fs::File::create(&path).unwrap()),
            stderr: StreamHandle::Null,
        };

        let mut env = vec![("SHELLY_LAUNCH_TEST".to_string(), "from-store".to_string())];
        if let Ok(path_var) = std::env::var("PATH") {
            env.push(("PATH".to_string(), path_var));
        }
        let args = vec!["-c".to_string(), "echo $SHELLY_LAUNCH_TEST".to_string()];
        launch("sh", &args, ProcessGroup::Inherit, &streams, env, LaunchMode::Foreground).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "from-store\n");
    }

    #[test]
    fn test_background_leader_gets_own_group() {
        let args = vec!["5".to_string()];
        let launched = launch(
            "sleep",
            &args,
            ProcessGroup::Leader,
            &StdStreams::null(),
            host_env(),
            LaunchMode::Background,
        )
        .unwrap();
        let pid = launched.pid().unwrap();

        let pgid = unsafe { libc::getpgid(pid as libc::pid_t) };
        assert_eq!(pgid, pid as libc::pid_t);

        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGKILL);
        }
        wait_blocking(pid);
    }
}
