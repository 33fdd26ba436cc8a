mod expand;
mod vars;

pub use expand::{expand_env_vars, MAX_COMMAND_LEN};
pub use vars::EnvVarManager;
pub(crate) use vars::is_valid_name;

#[derive(Debug, PartialEq, Eq)]
pub enum EnvError {
    InvalidName(String),
    InvalidValue(&'static str),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::InvalidName(name) => write!(f, "Invalid variable name: '{}'", name),
            EnvError::InvalidValue(val) => write!(f, "Invalid value: {}", val),
        }
    }
}

impl std::error::Error for EnvError {}
