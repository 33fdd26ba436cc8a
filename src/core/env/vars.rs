use super::EnvError;
use std::collections::BTreeMap;
use std::env;

/// The shell's variable store.
///
/// Launched programs receive exactly these variables, so the shell never has
/// to mutate its own process environment.
#[derive(Clone, Debug, Default)]
pub struct EnvVarManager {
    vars: BTreeMap<String, String>,
}

impl EnvVarManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from the environment the shell was started with.
    /// Entries that are not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: env::vars_os()
                .filter_map(|(name, value)| {
                    Some((name.into_string().ok()?, value.into_string().ok()?))
                })
                .collect(),
        }
    }

    /// Names must be usable as `$NAME`: ASCII letters and underscores.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), EnvError> {
        if !is_valid_name(name) {
            return Err(EnvError::InvalidName(name.to_string()));
        }
        if value.contains('\0') {
            return Err(EnvError::InvalidValue("value contains a NUL byte"));
        }

        self.vars.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}
