//! Tape statistics
//!
//! Pure functions over stored rows: summary aggregates and resampling.

mod resample;
mod summary;

pub use resample::{resample_mean_price, PricePoint};
pub use summary::TapeSummary;
