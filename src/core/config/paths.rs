use std::path::{Path, PathBuf};

use super::ConfigError;

const RC_FILE: &str = ".shellyrc";
const HISTORY_FILE: &str = ".shelly-history";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub home: PathBuf,
    pub rc_path: PathBuf,
    /// Set when `rc_path` came from the command line and must exist.
    pub rc_required: bool,
    pub history_path: PathBuf,
}

impl ConfigPaths {
    pub fn new(rc_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        Ok(Self::with_home(&home, rc_override))
    }

    pub fn with_home(home: &Path, rc_override: Option<PathBuf>) -> Self {
        let rc_required = rc_override.is_some();
        ConfigPaths {
            home: home.to_path_buf(),
            rc_path: rc_override.unwrap_or_else(|| home.join(RC_FILE)),
            rc_required,
            history_path: home.join(HISTORY_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let paths = ConfigPaths::with_home(Path::new("/home/testuser"), None);
        assert_eq!(paths.rc_path, PathBuf::from("/home/testuser/.shellyrc"));
        assert_eq!(paths.history_path, PathBuf::from("/home/testuser/.shelly-history"));
        assert!(!paths.rc_required);
    }

    #[test]
    fn test_rc_override() {
        let paths = ConfigPaths::with_home(
            Path::new("/home/testuser"),
            Some(PathBuf::from("/etc/shellyrc")),
        );
        assert_eq!(paths.rc_path, PathBuf::from("/etc/shellyrc"));
        assert!(paths.rc_required);
    }
}
