use std::io::Write;

use super::{CommandError, CommandKind, COMMANDS};
use crate::core::state::ShellState;

pub(super) fn byebye(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    if argv.len() != 1 {
        return Err(CommandError::Usage(CommandKind::ByeBye.usage()));
    }
    state.running = false;
    Ok(())
}

pub(super) fn help(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    if argv.len() != 1 {
        return Err(CommandError::Usage(CommandKind::Help.usage()));
    }

    writeln!(state.out, "Shelly usage:")?;
    for usage in COMMANDS.iter().filter_map(|descriptor| descriptor.usage) {
        writeln!(state.out, "  {:<28} {}", usage.synopsis, usage.summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core::commands::{run_literal, CommandError};
    use crate::core::state::testing::test_state;

    #[test]
    fn test_byebye_stops_the_session() {
        let (mut state, _out) = test_state();
        run_literal(&mut state, "byebye", 0).unwrap();
        assert!(!state.is_running());

        let (mut state, _out) = test_state();
        run_literal(&mut state, "exit", 0).unwrap();
        assert!(!state.is_running());
    }

    #[test]
    fn test_byebye_takes_no_arguments() {
        let (mut state, _out) = test_state();
        assert!(matches!(run_literal(&mut state, "byebye now", 0), Err(CommandError::Usage(_))));
        assert!(state.is_running());
    }

    #[test]
    fn test_help_lists_commands_not_aliases() {
        let (mut state, out) = test_state();
        run_literal(&mut state, "help", 0).unwrap();

        let text = out.contents();
        assert!(text.starts_with("Shelly usage:\n"));
        assert!(text.contains("movetodir <dir>"));
        assert!(text.contains("repeat <n> <program> [param]"));
        assert_eq!(text.lines().count(), 14);
        assert!(!text.lines().any(|line| line.trim_start().starts_with("killall")));
    }
}
