//! Fixed-width time bucketing

use crate::data::TradeRecord;
use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Mean price of one time bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricePoint {
    /// Bucket start
    pub bucket: NaiveDateTime,
    pub mean_price: Decimal,
    pub trades: usize,
}

/// Mean price per `width_secs` bucket of receipt time, oldest first.
///
/// Empty buckets are omitted. A zero width is treated as one second.
pub fn resample_mean_price(records: &[TradeRecord], width_secs: u64) -> Vec<PricePoint> {
    let width = width_secs.max(1) as i64;
    let mut buckets: BTreeMap<i64, (Decimal, usize)> = BTreeMap::new();

    for record in records {
        let secs = record.timestamp.and_utc().timestamp();
        let key = secs - secs.rem_euclid(width);
        let entry = buckets.entry(key).or_insert((Decimal::ZERO, 0));
        entry.0 += record.price;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .filter_map(|(key, (sum, trades))| {
            let bucket = DateTime::from_timestamp(key, 0)?.naive_utc();
            Some(PricePoint {
                bucket,
                mean_price: sum / Decimal::from(trades),
                trades,
            })
        })
        .collect()
}
