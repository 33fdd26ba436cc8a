use std::{
    fs,
    path::{Path, PathBuf},
};

use rustyline::completion::Pair;

use crate::path::PathExpander;

/// Completes directory names, for the argument of `movetodir`.
#[derive(Clone, Debug, Default)]
pub struct PathCompleter {
    expander: PathExpander,
}

impl PathCompleter {
    pub fn new() -> Self {
        Self {
            expander: PathExpander::new(),
        }
    }

    #[cfg(test)]
    fn with_expander(expander: PathExpander) -> Self {
        Self { expander }
    }

    pub fn complete_dir(&self, incomplete: &str) -> Vec<Pair> {
        let (typed_dir, prefix) = split_input(incomplete);
        let search_dir = if typed_dir.is_empty() {
            PathBuf::from(".")
        } else {
            match self.expander.expand(typed_dir) {
                Ok(dir) => dir,
                Err(_) => return Vec::new(),
            }
        };

        let mut matches = Vec::new();
        if let Ok(entries) = fs::read_dir(&search_dir) {
            for entry in entries.filter_map(Result::ok) {
                let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                    continue;
                };
                // dotfiles only when asked for
                let hidden = name.starts_with('.') && !prefix.starts_with('.');
                if !name.starts_with(prefix) || hidden {
                    continue;
                }
                if is_dir(&entry.path()) {
                    let candidate = format!("{}{}/", typed_dir, name);
                    matches.push(Pair {
                        display: format!("{}/", name),
                        replacement: candidate,
                    });
                }
            }
        }

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }
}

/// Split at the last `/`, keeping it on the directory side.
fn split_input(incomplete: &str) -> (&str, &str) {
    match incomplete.rfind('/') {
        Some(idx) => incomplete.split_at(idx + 1),
        None => ("", incomplete),
    }
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_dir()).unwrap_or(false)
}
