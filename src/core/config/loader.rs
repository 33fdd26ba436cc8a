use std::{fs, path::Path};

use tracing::debug;

use super::{Config, ConfigError};
use crate::core::env::{expand_env_vars, is_valid_name, EnvVarManager};
use crate::path::PathExpander;

pub struct ConfigLoader<'a> {
    env: &'a mut EnvVarManager,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(env: &'a mut EnvVarManager) -> Self {
        Self { env }
    }

    pub fn load_file(
        &mut self,
        path: &Path,
        required: bool,
        config: &mut Config,
    ) -> Result<(), ConfigError> {
        if !path.exists() {
            if required {
                return Err(ConfigError::ConfigFileNotFound(path.to_path_buf()));
            }
            debug!(path = %path.display(), "no rc file");
            return Ok(());
        }

        let content = fs::read_to_string(path)?;
        self.load_str(&content, config)?;
        debug!(path = %path.display(), "loaded rc file");
        Ok(())
    }

    pub fn load_str(&mut self, content: &str, config: &mut Config) -> Result<(), ConfigError> {
        for (index, line) in content.lines().enumerate() {
            self.process_line(line, config)
                .map_err(|reason| ConfigError::InvalidLine { line: index + 1, reason })?;
        }
        config
            .escapes
            .validate()
            .map_err(|reason| ConfigError::InvalidLine {
                line: 0,
                reason: reason.to_string(),
            })
    }

    fn process_line(&mut self, line: &str, config: &mut Config) -> Result<(), String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        if let Some(def) = line.strip_prefix("export ") {
            return self.process_export(def);
        }

        match line.split_once('=') {
            Some((key, value)) => process_option(key.trim(), unquote(value.trim()), config),
            None => Err(format!("cannot parse '{}'", line)),
        }
    }

    fn process_export(&mut self, def: &str) -> Result<(), String> {
        let (name, value) = def
            .split_once('=')
            .ok_or_else(|| format!("export needs NAME=VALUE, got '{}'", def.trim()))?;

        let value = expand_env_vars(unquote(value.trim()), self.env).map_err(|e| e.to_string())?;
        self.env.set(name.trim(), &value).map_err(|e| e.to_string())
    }
}

fn process_option(key: &str, value: &str, config: &mut Config) -> Result<(), String> {
    match key {
        "history_file" => {
            config.history_file = PathExpander::new().expand(value).map_err(|e| e.to_string())?;
        }
        "prompt_var" => {
            if !is_valid_name(value) {
                return Err(format!("'{}' is not a variable name", value));
            }
            config.prompt_var = value.to_string();
        }
        "escape_dollar" => config.escapes.dollar = single_char(value)?,
        "escape_space" => config.escapes.space = single_char(value)?,
        _ => return Err(format!("unknown option '{}'", key)),
    }
    Ok(())
}

fn single_char(value: &str) -> Result<char, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected a single character, got '{}'", value)),
    }
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::Escapes;
    use crate::core::config::ConfigPaths;
    use std::path::PathBuf;

    fn load(content: &str) -> Result<(Config, EnvVarManager), ConfigError> {
        let mut config = Config::with_paths(ConfigPaths::with_home(Path::new("/home/test"), None));
        let mut env = EnvVarManager::new();
        env.set("HOME", "/home/test").unwrap();
        ConfigLoader::new(&mut env).load_str(content, &mut config)?;
        Ok((config, env))
    }

    #[test]
    fn test_exports_seed_the_store() {
        let (_, env) = load(
            r#"
            # greeting
            export GREETING="hello world"
            export BIN=$HOME/bin
            export RAW='$NOPE'
        "#,
        )
        .unwrap();

        assert_eq!(env.get("GREETING"), Some("hello world"));
        assert_eq!(env.get("BIN"), Some("/home/test/bin"));
        assert_eq!(env.get("RAW"), Some("$NOPE"));
    }

    #[test]
    fn test_options() {
        let (config, _) = load(
            "history_file = /tmp/shelly-hist\n\
             prompt_var = MY_PROMPT\n\
             escape_dollar = @\n\
             escape_space = '~'\n",
        )
        .unwrap();

        assert_eq!(config.history_file(), Path::new("/tmp/shelly-hist"));
        assert_eq!(config.prompt_var(), "MY_PROMPT");
        assert_eq!(config.escapes(), Escapes { dollar: '@', space: '~' });
    }

    #[test]
    fn test_defaults_without_rc() {
        let (config, _) = load("").unwrap();
        assert_eq!(config.history_file(), Path::new("/home/test/.shelly-history"));
        assert_eq!(config.prompt_var(), "SHELLY_PROMPT");
        assert_eq!(config.escapes(), Escapes::default());
    }

    #[test]
    fn test_invalid_lines_name_their_number() {
        let err = load("export A=1\nalias ll=ls -la\n").err().unwrap();
        assert!(matches!(err, ConfigError::InvalidLine { line: 2, .. }));

        let err = load("\n\nexport 9X=1\n").err().unwrap();
        assert!(matches!(err, ConfigError::InvalidLine { line: 3, .. }));

        let err = load("escape_space = ab\n").err().unwrap();
        assert!(matches!(err, ConfigError::InvalidLine { line: 1, .. }));

        let err = load("prompt_var = P1\n").err().unwrap();
        assert!(matches!(err, ConfigError::InvalidLine { line: 1, .. }));
    }

    #[test]
    fn test_escape_characters_must_be_usable() {
        assert!(load("escape_dollar = ^\n").is_err());
        assert!(load("escape_space = $\n").is_err());
    }

    #[test]
    fn test_required_rc_must_exist() {
        let mut config = Config::with_paths(ConfigPaths::with_home(Path::new("/home/test"), None));
        let mut env = EnvVarManager::new();
        let missing = PathBuf::from("/nonexistent/shellyrc");

        let result = ConfigLoader::new(&mut env).load_file(&missing, true, &mut config);
        assert!(matches!(result, Err(ConfigError::ConfigFileNotFound(_))));
        ConfigLoader::new(&mut env).load_file(&missing, false, &mut config).unwrap();
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join("shellyrc");
        fs::write(&rc, "export FROM_FILE=yes\n").unwrap();

        let mut config = Config::with_paths(ConfigPaths::with_home(dir.path(), None));
        let mut env = EnvVarManager::new();
        ConfigLoader::new(&mut env).load_file(&rc, true, &mut config).unwrap();
        assert_eq!(env.get("FROM_FILE"), Some("yes"));
    }
}
