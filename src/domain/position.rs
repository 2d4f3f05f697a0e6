//! Position state and closed trade records.

use chrono::NaiveDate;

/// Long-only, single-slot position state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long,
}

/// A completed round trip: bought at `entry_price`, sold at `exit_price`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
}

impl TradeRecord {
    /// (exit - entry) / entry
    pub fn trade_return(&self) -> f64 {
        (self.exit_price - self.entry_price) / self.entry_price
    }

    /// Calendar days the position was held.
    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_trade(entry: f64, exit: f64) -> TradeRecord {
        TradeRecord {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            entry_price: entry,
            exit_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            exit_price: exit,
        }
    }

    #[test]
    fn default_position_is_flat() {
        assert_eq!(Position::default(), Position::Flat);
    }

    #[test]
    fn trade_return_profit() {
        assert_relative_eq!(sample_trade(100.0, 110.0).trade_return(), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn trade_return_loss() {
        assert_relative_eq!(sample_trade(110.0, 99.0).trade_return(), -0.10, epsilon = 1e-12);
    }

    #[test]
    fn holding_days() {
        assert_eq!(sample_trade(1.0, 1.0).holding_days(), 30);
    }
}
