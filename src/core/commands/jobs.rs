use std::io::Write;

use super::{CommandError, CommandKind};
use crate::core::state::ShellState;
use crate::process::signal::terminate_process;
use crate::process::{launch, LaunchMode, Launched, ProcessError, ProcessGroup, StdStreams};

pub(super) fn start(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    let [_, program, args @ ..] = argv else {
        return Err(CommandError::Usage(CommandKind::Start.usage()));
    };

    // foreground jobs share the shell's group so ^C at the terminal reaches them
    let launched = launch(
        program,
        args,
        ProcessGroup::Inherit,
        &state.streams,
        state.env.iter(),
        LaunchMode::Foreground,
    )?;
    if let Launched::Finished(status) = launched {
        if !status.success() {
            writeln!(state.out, "{}: {}", program, status)?;
        }
    }
    Ok(())
}

/// Start one background copy with its streams on /dev/null.
fn spawn_job(
    state: &ShellState,
    program: &str,
    args: &[String],
    group: ProcessGroup,
) -> Result<u32, CommandError> {
    let launched = launch(
        program,
        args,
        group,
        &StdStreams::null(),
        state.env.iter(),
        LaunchMode::Background,
    )?;
    launched.pid().ok_or_else(|| {
        ProcessError::Other(format!("{}: background launch returned no pid", program)).into()
    })
}

pub(super) fn background(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    let [_, program, args @ ..] = argv else {
        return Err(CommandError::Usage(CommandKind::Background.usage()));
    };

    // lock held across the spawn, so the reaper sees the pid before the exit
    let pid = state
        .jobs
        .track_with(|| spawn_job(state, program, args, ProcessGroup::Leader))?;
    writeln!(state.out, "[{}] {}", pid, program)?;
    Ok(())
}

/// Start `n` copies of a program as one new process group.
pub(super) fn repeat(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    let [_, count, program, args @ ..] = argv else {
        return Err(CommandError::Usage(CommandKind::Repeat.usage()));
    };
    let count: usize = match count.parse() {
        Ok(n) if n > 0 => n,
        _ => return Err(CommandError::Usage(CommandKind::Repeat.usage())),
    };

    let (pids, failure) = state.jobs.track_batch(count, |started| {
        let group = match started.first() {
            Some(&leader) => ProcessGroup::Join(leader),
            None => ProcessGroup::Leader,
        };
        spawn_job(state, program, args, group)
    })?;
    report_started(state, &pids, failure)
}

/// Print whatever part of a batch is running, then surface its failure.
fn report_started(
    state: &mut ShellState,
    pids: &[u32],
    failure: Option<CommandError>,
) -> Result<(), CommandError> {
    if !pids.is_empty() {
        let listed: Vec<String> = pids.iter().map(u32::to_string).collect();
        writeln!(state.out, "PIDs: {}", listed.join(", "))?;
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn parse_pid(arg: &str) -> Result<u32, CommandError> {
    match arg.parse::<u32>() {
        Ok(pid) if pid > 0 => Ok(pid),
        _ => Err(CommandError::InvalidArguments(format!("'{}' is not a pid", arg))),
    }
}

pub(super) fn dalek(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    let [_, pid] = argv else {
        return Err(CommandError::Usage(CommandKind::Dalek.usage()));
    };
    let pid = parse_pid(pid)?;

    // the reaper drops the pid from the job list once it has exited
    terminate_process(pid).map_err(|error| CommandError::Signal { pid, error })?;
    writeln!(state.out, "exterminated {}", pid)?;
    Ok(())
}

pub(super) fn dalekall(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    if argv.len() != 1 {
        return Err(CommandError::Usage(CommandKind::DalekAll.usage()));
    }

    let results = state.jobs.kill_all()?;
    if results.is_empty() {
        writeln!(state.out, "no background jobs")?;
        return Ok(());
    }

    for (pid, result) in results {
        match result {
            Ok(()) => writeln!(state.out, "exterminated {}", pid)?,
            Err(error) => writeln!(state.out, "{}: {}", pid, error)?,
        }
    }
    Ok(())
}

pub(super) fn lsbg(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    if argv.len() != 1 {
        return Err(CommandError::Usage(CommandKind::ListBackground.usage()));
    }

    for pid in state.jobs.snapshot()? {
        writeln!(state.out, "{}", pid)?;
    }
    Ok(())
}
