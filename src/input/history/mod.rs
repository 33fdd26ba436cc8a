mod file_ops;

use std::{collections::VecDeque, fmt, io, path::PathBuf};

use tracing::debug;

use self::file_ops::FileOps;

#[derive(Debug)]
pub enum HistoryError {
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Io { path, source } => {
                write!(f, "history file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Io { source, .. } => Some(source),
        }
    }
}

/// Past command lines, newest at the front.
///
/// Offset 0 is the most recent entry. When backed by a file, every added
/// line is appended to it as well; clearing only affects memory.
#[derive(Debug, Default)]
pub struct History {
    entries: VecDeque<String>,
    file_ops: Option<FileOps>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(history_file: PathBuf) -> Result<Self, HistoryError> {
        let file_ops = FileOps::new(history_file);
        let loaded = file_ops.load_entries().map_err(|source| HistoryError::Io {
            path: file_ops.path().to_path_buf(),
            source,
        })?;
        debug!(path = %file_ops.path().display(), entries = loaded.len(), "loaded history");

        let mut entries = VecDeque::with_capacity(loaded.len());
        for line in loaded {
            entries.push_front(line);
        }

        Ok(History {
            entries,
            file_ops: Some(file_ops),
        })
    }

    /// Push `entry` at the head. The in-memory list is updated even when
    /// writing the file fails.
    pub fn add(&mut self, entry: &str) -> Result<(), HistoryError> {
        self.entries.push_front(entry.to_owned());

        if let Some(file_ops) = &self.file_ops {
            file_ops.append_entry(entry).map_err(|source| HistoryError::Io {
                path: file_ops.path().to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn get(&self, offset: usize) -> Option<&str> {
        self.entries.get(offset).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(String::as_str)
    }
}
