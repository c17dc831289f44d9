//! Tape summary statistics and reporting

use crate::data::TradeRecord;
use crate::feed::Aggressor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Aggregates over every stored trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeSummary {
    /// Number of trades
    pub total_trades: usize,
    /// Price of the last trade
    pub latest_price: Decimal,
    /// Price of the first trade
    pub first_price: Decimal,
    /// Mean trade price
    pub avg_price: Decimal,
    /// Latest minus first price
    pub change: Decimal,
    /// Change as a fraction of the first price
    pub change_pct: Decimal,
    /// Highest price
    pub high: Decimal,
    /// Lowest price
    pub low: Decimal,
    /// Sum of quantities
    pub total_volume: Decimal,
    /// Mean quantity
    pub avg_trade_size: Decimal,
    /// Largest quantity
    pub largest_trade: Decimal,
    /// Trades where the buyer took liquidity
    pub buy_trades: usize,
    /// Trades where the seller took liquidity
    pub sell_trades: usize,
}

impl TapeSummary {
    /// Summarize the rows in file order; `None` when there are none
    pub fn from_records(records: &[TradeRecord]) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;

        let mut price_sum = Decimal::ZERO;
        let mut high = first.price;
        let mut low = first.price;
        let mut total_volume = Decimal::ZERO;
        let mut largest_trade = first.quantity;
        let mut buy_trades = 0;
        let mut sell_trades = 0;

        for record in records {
            price_sum += record.price;
            high = high.max(record.price);
            low = low.min(record.price);
            total_volume += record.quantity;
            largest_trade = largest_trade.max(record.quantity);
            match record.aggressor() {
                Aggressor::Buyer => buy_trades += 1,
                Aggressor::Seller => sell_trades += 1,
            }
        }

        let n = Decimal::from(records.len());
        let change = last.price - first.price;
        let change_pct = if first.price.is_zero() {
            Decimal::ZERO
        } else {
            change / first.price
        };

        Some(Self {
            total_trades: records.len(),
            latest_price: last.price,
            first_price: first.price,
            avg_price: price_sum / n,
            change,
            change_pct,
            high,
            low,
            total_volume,
            avg_trade_size: total_volume / n,
            largest_trade,
            buy_trades,
            sell_trades,
        })
    }

    /// Highest minus lowest price
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// Share of buyer-aggressor trades
    pub fn buy_pct(&self) -> Decimal {
        Decimal::from(self.buy_trades) / Decimal::from(self.total_trades)
    }

    /// Share of seller-aggressor trades
    pub fn sell_pct(&self) -> Decimal {
        Decimal::from(self.sell_trades) / Decimal::from(self.total_trades)
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
               TRADE TAPE SUMMARY
══════════════════════════════════════════════════════

PRICE
───────────────────────────────────────────────────────
Latest Price:     ${:.2}
Total Trades:     {}
Average Price:    ${:.2}
Change:           {:+.2} ({:+.3}%)

PRICE RANGE
───────────────────────────────────────────────────────
Highest:          ${:.2}
Lowest:           ${:.2}
Range:            ${:.2}

VOLUME
───────────────────────────────────────────────────────
Total Volume:     {:.4}
Avg Trade Size:   {:.5}
Largest Trade:    {:.5}

MARKET PRESSURE
───────────────────────────────────────────────────────
Buy Pressure:     {} trades ({:.1}%)
Sell Pressure:    {} trades ({:.1}%)
══════════════════════════════════════════════════════
"#,
            self.latest_price,
            self.total_trades,
            self.avg_price,
            self.change,
            self.change_pct * dec!(100),
            self.high,
            self.low,
            self.range(),
            self.total_volume,
            self.avg_trade_size,
            self.largest_trade,
            self.buy_trades,
            self.buy_pct() * dec!(100),
            self.sell_trades,
            self.sell_pct() * dec!(100),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(price: Decimal, quantity: Decimal, is_buyer_maker: bool) -> TradeRecord {
        TradeRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            price,
            quantity,
            trade_time_ms: 1_704_067_200_000,
            is_buyer_maker,
        }
    }

    #[test]
    fn test_empty_has_no_summary() {
        assert!(TapeSummary::from_records(&[]).is_none());
    }

    #[test]
    fn test_summary_values() {
        let records = vec![
            record(dec!(100), dec!(0.5), false),
            record(dec!(110), dec!(1.5), true),
            record(dec!(90), dec!(1.0), false),
            record(dec!(120), dec!(1.0), false),
        ];

        let summary = TapeSummary::from_records(&records).unwrap();
        assert_eq!(summary.total_trades, 4);
        assert_eq!(summary.latest_price, dec!(120));
        assert_eq!(summary.avg_price, dec!(105));
        assert_eq!(summary.change, dec!(20));
        assert_eq!(summary.change_pct, dec!(0.2));
        assert_eq!(summary.high, dec!(120));
        assert_eq!(summary.low, dec!(90));
        assert_eq!(summary.range(), dec!(30));
        assert_eq!(summary.total_volume, dec!(4.0));
        assert_eq!(summary.avg_trade_size, dec!(1.0));
        assert_eq!(summary.largest_trade, dec!(1.5));
        assert_eq!(summary.buy_trades, 3);
        assert_eq!(summary.sell_trades, 1);
        assert_eq!(summary.buy_pct(), dec!(0.75));
    }

    #[test]
    fn test_zero_first_price() {
        let records = vec![record(dec!(0), dec!(1), false), record(dec!(5), dec!(1), false)];
        let summary = TapeSummary::from_records(&records).unwrap();
        assert_eq!(summary.change_pct, Decimal::ZERO);
    }

    #[test]
    fn test_format_table() {
        let records = vec![
            record(dec!(50000.00), dec!(0.001), false),
            record(dec!(50010.50), dec!(0.002), true),
        ];
        let table = TapeSummary::from_records(&records).unwrap().format_table();
        assert!(table.contains("Latest Price:     $50010.50"));
        assert!(table.contains("Total Trades:     2"));
        assert!(table.contains("Buy Pressure:     1 trades (50.0%)"));
    }
}
