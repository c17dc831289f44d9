//! Data capture module
//!
//! Stores trades in an append-only CSV tape and reads them back

mod csv;
mod reader;
mod record;
mod recorder;
mod types;

pub use csv::CsvStore;
pub use reader::{count_rows, load_trades, TradeLog};
pub use record::{TradeRecord, CSV_HEADER, TIMESTAMP_FORMAT};
pub use recorder::Recorder;
pub use types::{RecordError, RowError, StoreError};

/// Durable, append-only destination for trade rows
pub trait TradeStore {
    /// Append one row; a returned error means the row is not stored
    fn append(&mut self, record: &TradeRecord) -> Result<(), StoreError>;
}
