use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

/// Line-per-entry history file, oldest entry first.
#[derive(Debug)]
pub struct FileOps {
    file_path: PathBuf,
}

impl FileOps {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn load_entries(&self) -> io::Result<Vec<String>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.file_path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                entries.push(line);
            }
        }
        Ok(entries)
    }

    pub fn append_entry(&self, entry: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.file_path)?;

        writeln!(file, "{}", entry)
    }
}
