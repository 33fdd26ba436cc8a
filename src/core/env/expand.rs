use super::EnvVarManager;
use crate::core::commands::ParseError;

/// Longest line, before or after expansion, the shell will handle.
pub const MAX_COMMAND_LEN: usize = 64 * 1024;

/// Replace every `$NAME` whose name is defined in `env`.
///
/// A name is the longest run of ASCII letters and underscores after the `$`.
/// Undefined names, and a `$` with no name after it, are copied through as
/// written. Escape characters are left for the tokenizer.
pub fn expand_env_vars(input: &str, env: &EnvVarManager) -> Result<String, ParseError> {
    check_len(input.len())?;

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(dollar_pos) = rest.find('$') {
        result.push_str(&rest[..dollar_pos]);

        let after = &rest[dollar_pos + 1..];
        let name_end = after
            .find(|c: char| !c.is_ascii_alphabetic() && c != '_')
            .unwrap_or(after.len());
        let var_name = &after[..name_end];

        match env.get(var_name) {
            Some(value) if !var_name.is_empty() => result.push_str(value),
            _ => {
                result.push('$');
                result.push_str(var_name);
            }
        }

        check_len(result.len())?;
        rest = &after[name_end..];
    }

    result.push_str(rest);
    check_len(result.len())?;
    Ok(result)
}

fn check_len(len: usize) -> Result<(), ParseError> {
    if len > MAX_COMMAND_LEN {
        return Err(ParseError::LineTooLong {
            len,
            max: MAX_COMMAND_LEN,
        });
    }
    Ok(())
}
