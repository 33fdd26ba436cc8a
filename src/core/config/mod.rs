use std::{
    fmt,
    path::{Path, PathBuf},
};

mod loader;
mod paths;

use super::commands::Escapes;
use super::env::EnvVarManager;
use loader::ConfigLoader;
pub use paths::ConfigPaths;

/// Startup settings, read once from the rc file.
#[derive(Debug, Clone)]
pub struct Config {
    paths: ConfigPaths,
    history_file: PathBuf,
    prompt_var: String,
    escapes: Escapes,
}

pub const DEFAULT_PROMPT_VAR: &str = "SHELLY_PROMPT";

impl Config {
    pub fn new(rc_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self::with_paths(ConfigPaths::new(rc_override)?))
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Config {
            history_file: paths.history_path.clone(),
            paths,
            prompt_var: DEFAULT_PROMPT_VAR.to_string(),
            escapes: Escapes::default(),
        }
    }

    /// Apply the rc file: options land here, `export` lines in `env`.
    pub fn load(&mut self, env: &mut EnvVarManager) -> Result<(), ConfigError> {
        let rc_path = self.paths.rc_path.clone();
        let required = self.paths.rc_required;
        ConfigLoader::new(env).load_file(&rc_path, required, self)
    }

    pub fn history_file(&self) -> &Path {
        &self.history_file
    }

    pub fn prompt_var(&self) -> &str {
        &self.prompt_var
    }

    pub fn escapes(&self) -> Escapes {
        self.escapes
    }
}

#[derive(Debug)]
pub enum ConfigError {
    HomeDirNotFound,
    ConfigFileNotFound(PathBuf),
    InvalidLine { line: usize, reason: String },
    IoError(std::io::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HomeDirNotFound => write!(f, "Home directory not found"),
            ConfigError::ConfigFileNotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            ConfigError::InvalidLine { line: 0, reason } => write!(f, "{}", reason),
            ConfigError::InvalidLine { line, reason } => write!(f, "line {}: {}", line, reason),
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
