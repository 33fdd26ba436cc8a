use std::io::Write;

use super::{run_literal, CommandError, CommandKind, MAX_REPLAY_DEPTH};
use crate::core::state::ShellState;

pub(super) fn history(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    match argv {
        [_] => {
            for (index, entry) in state.history.iter_oldest_first().enumerate() {
                writeln!(state.out, "{}: {}", index, entry)?;
            }
            Ok(())
        }
        [_, flag] if flag == "-c" => {
            state.history.clear();
            Ok(())
        }
        _ => Err(CommandError::Usage(CommandKind::History.usage())),
    }
}

/// Re-run the entry `n` steps back from the newest one.
///
/// Offset 0 is the `replay` line itself. The replayed text goes through the
/// same expansion and dispatch as typed input, one level deeper.
pub(super) fn replay(
    state: &mut ShellState,
    argv: &[String],
    depth: usize,
) -> Result<(), CommandError> {
    let [_, offset] = argv else {
        return Err(CommandError::Usage(CommandKind::Replay.usage()));
    };
    let offset: usize = offset
        .parse()
        .map_err(|_| CommandError::Usage(CommandKind::Replay.usage()))?;

    if depth >= MAX_REPLAY_DEPTH {
        return Err(CommandError::ReplayRecursionExceeded(MAX_REPLAY_DEPTH));
    }

    let line = state
        .history
        .get(offset)
        .ok_or(CommandError::HistoryDepthExceeded(offset))?
        .to_string();
    run_literal(state, &line, depth + 1)
}

#[cfg(test)]
mod tests {
    use crate::core::commands::{run_literal, CommandError, MAX_REPLAY_DEPTH};
    use crate::core::state::testing::test_state;

    #[test]
    fn test_history_lists_oldest_first() {
        let (mut state, out) = test_state();
        state.accept_line("whereami").unwrap();
        state.accept_line("set A b").unwrap();
        out.clear();

        state.accept_line("history").unwrap();
        assert_eq!(out.contents(), "0: whereami\n1: set A b\n2: history\n");
    }

    #[test]
    fn test_history_clear() {
        let (mut state, out) = test_state();
        state.accept_line("whereami").unwrap();
        state.accept_line("lsbg").unwrap();

        state.accept_line("history -c").unwrap();
        assert!(state.history().is_empty());
        assert_eq!(state.history().len(), 0);

        out.clear();
        run_literal(&mut state, "history", 0).unwrap();
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_history_bad_flag() {
        let (mut state, _out) = test_state();
        assert!(matches!(
            state.accept_line("history -x"),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_replay_one_runs_previous_command() {
        let (mut state, _out) = test_state();
        state.accept_line("set SHELLY_REPLAY first").unwrap();
        state.accept_line("set SHELLY_REPLAY second").unwrap();
        state.env.set("SHELLY_REPLAY", "changed").unwrap();

        state.accept_line("replay 1").unwrap();
        assert_eq!(state.env().get("SHELLY_REPLAY"), Some("second"));

        // "replay 1" is now offset 1, "set ... second" offset 2
        state.accept_line("replay 3").unwrap();
        assert_eq!(state.env().get("SHELLY_REPLAY"), Some("first"));
    }

    #[test]
    fn test_replay_is_not_recorded_again() {
        let (mut state, _out) = test_state();
        state.accept_line("whereami").unwrap();
        state.accept_line("replay 1").unwrap();
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_replay_expands_variables_at_replay_time() {
        let (mut state, _out) = test_state();
        state.env.set("SRC", "one").unwrap();
        state.accept_line("set DST $SRC").unwrap();
        state.env.set("SRC", "two").unwrap();
        state.accept_line("replay 1").unwrap();
        assert_eq!(state.env().get("DST"), Some("two"));
    }

    #[test]
    fn test_replay_past_history_end() {
        let (mut state, _out) = test_state();
        state.accept_line("whereami").unwrap();
        let result = state.accept_line("replay 2");
        assert!(matches!(result, Err(CommandError::HistoryDepthExceeded(2))));
    }

    #[test]
    fn test_replay_needs_a_number() {
        let (mut state, _out) = test_state();
        assert!(matches!(state.accept_line("replay"), Err(CommandError::Usage(_))));
        assert!(matches!(state.accept_line("replay x"), Err(CommandError::Usage(_))));
        assert!(matches!(state.accept_line("replay -1"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_self_referencing_replay_is_cut_off() {
        let (mut state, _out) = test_state();
        // offset 1 is "replay 0", which points back at the head again
        state.accept_line("replay 0").unwrap_err();
        let result = state.accept_line("replay 1");
        assert!(matches!(
            result,
            Err(CommandError::ReplayRecursionExceeded(MAX_REPLAY_DEPTH))
        ));
    }

    #[test]
    fn test_replay_zero_is_cut_off() {
        let (mut state, _out) = test_state();
        let result = state.accept_line("replay 0");
        assert!(matches!(
            result,
            Err(CommandError::ReplayRecursionExceeded(MAX_REPLAY_DEPTH))
        ));
    }

    #[test]
    fn test_sixteen_nested_replays_are_allowed() {
        let (mut state, _out) = test_state();
        // a ladder where the entry at offset k is "replay k+1"
        state.accept_line("set SHELLY_DEPTH reached").unwrap();
        for offset in (1..=MAX_REPLAY_DEPTH - 1).rev() {
            state.history.add(&format!("replay {}", offset + 1)).unwrap();
        }
        state.env.remove("SHELLY_DEPTH");
        state.accept_line("replay 1").unwrap();
        assert_eq!(state.env().get("SHELLY_DEPTH"), Some("reached"));
    }
}
