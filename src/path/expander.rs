use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
pub enum PathError {
    HomeDirNotFound,
    NotADirectory(PathBuf),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Home directory not found"),
            PathError::NotADirectory(path) => write!(f, "{}: no such directory", path.display()),
        }
    }
}

impl std::error::Error for PathError {}

/// Tilde expansion for directory arguments.
#[derive(Clone, Debug)]
pub struct PathExpander {
    home: Option<PathBuf>,
}

impl Default for PathExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl PathExpander {
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }

    pub fn expand(&self, path: &str) -> Result<PathBuf, PathError> {
        match path.strip_prefix('~') {
            Some("") => self.home(),
            Some(rest) if rest.starts_with('/') => {
                let mut home_path = self.home()?;
                for part in rest.split('/').filter(|part| !part.is_empty()) {
                    home_path.push(part);
                }
                Ok(home_path)
            }
            // "~user" is left alone
            _ => Ok(Path::new(path).to_path_buf()),
        }
    }

    /// Expand and require an existing directory.
    pub fn expand_dir(&self, path: &str) -> Result<PathBuf, PathError> {
        let expanded = self.expand(path)?;
        if expanded.is_dir() {
            Ok(expanded)
        } else {
            Err(PathError::NotADirectory(expanded))
        }
    }

    fn home(&self) -> Result<PathBuf, PathError> {
        self.home.clone().ok_or(PathError::HomeDirNotFound)
    }
}
