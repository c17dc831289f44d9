//! Append-only CSV trade tape

use super::record::{TradeRecord, CSV_HEADER};
use super::types::StoreError;
use super::TradeStore;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// CSV file store, opened lazily on the first append
pub struct CsvStore {
    path: PathBuf,
    file: Option<File>,
}

impl CsvStore {
    /// Create a store for the given path; nothing touches the disk yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// Path of the tape
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory, open for append and write the header if the
    /// file is new or empty
    fn open(&self) -> Result<File, StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Open {
                path: self.path.clone(),
                source,
            })?;
        }

        let existing_len = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        let needs_newline = existing_len > 0
            && !ends_with_newline(&self.path).map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StoreError::Open {
                path: self.path.clone(),
                source,
            })?;

        let prefix = if existing_len == 0 {
            tracing::info!(path = ?self.path, "Creating trade file");
            format!("{}\n", CSV_HEADER)
        } else if needs_newline {
            tracing::warn!(path = ?self.path, "Trade file ends mid-line, starting a new line");
            "\n".to_string()
        } else {
            String::new()
        };

        if !prefix.is_empty() {
            file.write_all(prefix.as_bytes())
                .map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
        }

        Ok(file)
    }
}

impl TradeStore for CsvStore {
    fn append(&mut self, record: &TradeRecord) -> Result<(), StoreError> {
        let file = match self.file.take() {
            Some(file) => file,
            None => self.open()?,
        };
        let file = self.file.insert(file);

        let line = format!("{}\n", record.to_csv_line());
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

fn ends_with_newline(path: &Path) -> std::io::Result<bool> {
    let mut file = File::open(path)?;
    if file.seek(SeekFrom::End(0))? == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
