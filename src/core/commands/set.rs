use super::{CommandError, CommandKind};
use crate::core::state::ShellState;

/// `set key value` stores a variable, `set key` removes it.
pub(super) fn set(state: &mut ShellState, argv: &[String]) -> Result<(), CommandError> {
    match argv {
        [_, key, value] => {
            state.env.set(key, value)?;
            Ok(())
        }
        [_, key] => {
            state.env.remove(key);
            Ok(())
        }
        _ => Err(CommandError::Usage(CommandKind::Set.usage())),
    }
}
