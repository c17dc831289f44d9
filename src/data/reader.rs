//! Trade tape reader

use super::record::{TradeRecord, CSV_HEADER};
use super::types::StoreError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Rows loaded from a tape
#[derive(Debug, Clone, Default)]
pub struct TradeLog {
    /// Parsed rows in file order
    pub records: Vec<TradeRecord>,
    /// Rows that failed to parse (typically a partially flushed last line)
    pub skipped: usize,
}

fn open(path: &Path) -> Result<BufReader<File>, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Visit every data row after checking the header
fn for_each_row(path: &Path, mut f: impl FnMut(usize, &str)) -> Result<(), StoreError> {
    let reader = open(path)?;
    let mut lines = reader.lines().enumerate();

    match lines.next() {
        None => return Ok(()),
        Some((_, line)) => {
            let header = line.map_err(|source| StoreError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            if header.trim_end_matches('\r') != CSV_HEADER {
                return Err(StoreError::InvalidHeader {
                    path: path.to_path_buf(),
                    found: header,
                });
            }
        }
    }

    for (idx, line) in lines {
        let line = line.map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        f(idx + 1, &line);
    }

    Ok(())
}

/// Load and parse every row of the tape, skipping rows that do not parse
pub fn load_trades(path: impl AsRef<Path>) -> Result<TradeLog, StoreError> {
    let path = path.as_ref();
    let mut log = TradeLog::default();

    for_each_row(path, |line_no, line| match TradeRecord::from_csv_line(line) {
        Ok(record) => log.records.push(record),
        Err(e) => {
            tracing::debug!(line = line_no, error = %e, "Skipping row");
            log.skipped += 1;
        }
    })?;

    if log.skipped > 0 {
        tracing::warn!(path = ?path, skipped = log.skipped, "Skipped unparsable rows");
    }

    Ok(log)
}

/// Count stored trades. Torn or unparsable rows are not trades and are left
/// out of the total.
pub fn count_rows(path: impl AsRef<Path>) -> Result<u64, StoreError> {
    let mut count = 0;
    for_each_row(path.as_ref(), |_, line| {
        if TradeRecord::from_csv_line(line).is_ok() {
            count += 1;
        }
    })?;
    Ok(count)
}
