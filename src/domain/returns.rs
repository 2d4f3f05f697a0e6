//! Trade pairing and return statistics.
//!
//! The k-th buy is paired with the k-th sell. Both lists must be strictly
//! ascending and interleave as buy < sell < next buy. A trailing buy without
//! a sell is left out of every return figure and reported as `open_entry`.

use chrono::NaiveDate;

use crate::domain::error::BandsigError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::position::TradeRecord;

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSummary {
    pub trades: Vec<TradeRecord>,
    pub per_trade_returns: Vec<f64>,
    pub cumulative_return: f64,
    pub annualized_return: f64,
    /// Calendar days between the first and last bar of the series.
    pub total_days: i64,
    /// Entry of a position still open at the end of the series.
    pub open_entry: Option<NaiveDate>,
}

impl ReturnSummary {
    pub fn cumulative_percent(&self) -> f64 {
        as_percent(self.cumulative_return)
    }

    pub fn annualized_percent(&self) -> f64 {
        as_percent(self.annualized_return)
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

/// `fraction` × 100, rounded to two decimals.
pub fn as_percent(fraction: f64) -> f64 {
    (fraction * 100.0 * 100.0).round() / 100.0
}

/// Π(1 + r) - 1. Zero for no trades.
pub fn cumulative_return(per_trade_returns: &[f64]) -> f64 {
    per_trade_returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0
}

/// (1 + cumulative)^(365 / total_days) - 1.
pub fn annualized_return(cumulative: f64, total_days: i64) -> Result<f64, BandsigError> {
    if total_days <= 0 {
        return Err(BandsigError::ZeroElapsedDays);
    }
    Ok((1.0 + cumulative).powf(DAYS_PER_YEAR / total_days as f64) - 1.0)
}

/// Pair buys with sells into trade records, checking the ordering contract.
///
/// Returns the trades and the unmatched trailing buy, if any.
pub fn pair_trades(
    buy_dates: &[NaiveDate],
    sell_dates: &[NaiveDate],
    series: &PriceSeries,
) -> Result<(Vec<TradeRecord>, Option<NaiveDate>), BandsigError> {
    ensure_ascending(buy_dates, "buy")?;
    ensure_ascending(sell_dates, "sell")?;

    if sell_dates.len() > buy_dates.len() {
        return Err(BandsigError::UnorderedSignals {
            reason: format!(
                "{} sells for {} buys",
                sell_dates.len(),
                buy_dates.len()
            ),
        });
    }

    let mut trades = Vec::with_capacity(sell_dates.len());
    for (k, (&entry_date, &exit_date)) in buy_dates.iter().zip(sell_dates).enumerate() {
        if exit_date <= entry_date {
            return Err(BandsigError::UnorderedSignals {
                reason: format!("sell on {} does not follow buy on {}", exit_date, entry_date),
            });
        }
        if let Some(&next_buy) = buy_dates.get(k + 1) {
            if next_buy <= exit_date {
                return Err(BandsigError::UnorderedSignals {
                    reason: format!("buy on {} while position from {} still open", next_buy, entry_date),
                });
            }
        }

        trades.push(TradeRecord {
            entry_date,
            entry_price: close_on(series, entry_date)?,
            exit_date,
            exit_price: close_on(series, exit_date)?,
        });
    }

    let open_entry = buy_dates.get(sell_dates.len()).copied();
    if buy_dates.len() > sell_dates.len() + 1 {
        return Err(BandsigError::UnorderedSignals {
            reason: format!(
                "{} buys for {} sells; only one position may be open",
                buy_dates.len(),
                sell_dates.len()
            ),
        });
    }

    Ok((trades, open_entry))
}

pub fn compute_returns(
    buy_dates: &[NaiveDate],
    sell_dates: &[NaiveDate],
    series: &PriceSeries,
) -> Result<ReturnSummary, BandsigError> {
    let total_days = series.span_days().ok_or_else(|| BandsigError::NoData {
        ticker: series.ticker.clone(),
    })?;

    let (trades, open_entry) = pair_trades(buy_dates, sell_dates, series)?;
    if let Some(date) = open_entry {
        tracing::info!(%date, "open position excluded from returns");
    }

    let per_trade_returns: Vec<f64> = trades.iter().map(TradeRecord::trade_return).collect();
    let cumulative = cumulative_return(&per_trade_returns);
    let annualized = annualized_return(cumulative, total_days)?;

    Ok(ReturnSummary {
        trades,
        per_trade_returns,
        cumulative_return: cumulative,
        annualized_return: annualized,
        total_days,
        open_entry,
    })
}

fn ensure_ascending(dates: &[NaiveDate], side: &str) -> Result<(), BandsigError> {
    match dates.windows(2).find(|w| w[1] <= w[0]) {
        Some(w) => Err(BandsigError::UnorderedSignals {
            reason: format!("{} dates not ascending at {} -> {}", side, w[0], w[1]),
        }),
        None => Ok(()),
    }
}

fn close_on(series: &PriceSeries, date: NaiveDate) -> Result<f64, BandsigError> {
    series
        .close_on(date)
        .ok_or(BandsigError::MissingPrice { date })
}
