use rustyline::completion::Pair;

use crate::core::commands::names;

/// Completes the first word against the builtin table.
#[derive(Clone, Debug, Default)]
pub struct CommandCompleter;

impl CommandCompleter {
    pub fn new() -> Self {
        Self
    }

    pub fn complete_command(&self, word: &str) -> Vec<Pair> {
        let input = word.trim();
        let mut matches: Vec<Pair> = names()
            .filter(|name| name.starts_with(input))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{} ", name),
            })
            .collect();
        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }
}
