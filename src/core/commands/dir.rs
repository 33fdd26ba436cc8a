use std::env;
use std::io::Write;

use super::{CommandError, CommandKind};
use crate::core::state::ShellState;
use crate::path::PathExpander;

pub(super) fn movetodir(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    let [_, target] = argv else {
        return Err(CommandError::Usage(CommandKind::MoveToDir.usage()));
    };

    let path = PathExpander::new().expand_dir(target)?;
    env::set_current_dir(&path)?;
    state.sync_current_dir()
}

pub(super) fn whereami(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    if argv.len() != 1 {
        return Err(CommandError::Usage(CommandKind::WhereAmI.usage()));
    }
    writeln!(state.out, "{}", state.current_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core::commands::{run_literal, CommandError};
    use crate::core::state::testing::test_state;
    use crate::path::PathError;
    use std::env;

    #[test]
    fn test_movetodir_updates_cwd_and_pwd() {
        let (mut state, out) = test_state();
        let target = env::temp_dir().canonicalize().unwrap();
        let target_str = target.to_string_lossy().into_owned();

        run_literal(&mut state, &format!("movetodir {}", target_str), 0).unwrap();
        assert_eq!(env::current_dir().unwrap(), target);
        assert_eq!(state.current_dir(), target_str);
        assert_eq!(state.env().get("PWD"), Some(target_str.as_str()));

        run_literal(&mut state, "whereami", 0).unwrap();
        assert_eq!(out.contents(), format!("{}\n", target_str));

        let missing = target.join("shelly-does-not-exist");
        let result = run_literal(&mut state, &format!("movetodir {}", missing.display()), 0);
        assert!(matches!(
            result,
            Err(CommandError::PathError(PathError::NotADirectory(_)))
        ));
        assert_eq!(state.current_dir(), target_str);
    }

    #[test]
    fn test_movetodir_usage() {
        let (mut state, _out) = test_state();
        assert!(matches!(
            run_literal(&mut state, "movetodir", 0),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            run_literal(&mut state, "movetodir a b", 0),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            run_literal(&mut state, "whereami now", 0),
            Err(CommandError::Usage(_))
        ));
    }
}
