//! Buy/sell signal generation.
//!
//! Single pass over an [`IndicatorFrame`], carrying a [`Position`] that starts
//! `Flat`. Per row:
//! - Flat and Close < LowerBand and RSI < oversold  => buy at Close, go Long
//! - Long and Close > UpperBand and RSI > overbought => sell at Close, go Flat
//! - otherwise no signal
//!
//! A row with an undefined band or RSI never satisfies either condition. The
//! decision for row i only reads row i.

use chrono::NaiveDate;

use crate::domain::indicator::{IndicatorFrame, IndicatorRow};
use crate::domain::position::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub buy: Option<f64>,
    pub sell: Option<f64>,
}

impl SignalRow {
    fn none(date: NaiveDate) -> Self {
        Self {
            date,
            buy: None,
            sell: None,
        }
    }
}

fn is_entry(row: &IndicatorRow, oversold: f64) -> bool {
    matches!(
        (row.lower_band, row.rsi),
        (Some(lower), Some(rsi)) if row.close < lower && rsi < oversold
    )
}

fn is_exit(row: &IndicatorRow, overbought: f64) -> bool {
    matches!(
        (row.upper_band, row.rsi),
        (Some(upper), Some(rsi)) if row.close > upper && rsi > overbought
    )
}

pub fn generate_signals(frame: &IndicatorFrame) -> Vec<SignalRow> {
    let mut position = Position::Flat;
    let mut signals = Vec::with_capacity(frame.rows.len());

    for row in &frame.rows {
        let signal = match position {
            Position::Flat if is_entry(row, frame.oversold) => {
                position = Position::Long;
                tracing::debug!(date = %row.date, price = row.close, "buy signal");
                SignalRow {
                    buy: Some(row.close),
                    ..SignalRow::none(row.date)
                }
            }
            Position::Long if is_exit(row, frame.overbought) => {
                position = Position::Flat;
                tracing::debug!(date = %row.date, price = row.close, "sell signal");
                SignalRow {
                    sell: Some(row.close),
                    ..SignalRow::none(row.date)
                }
            }
            _ => SignalRow::none(row.date),
        };
        signals.push(signal);
    }

    signals
}

pub fn buy_dates(signals: &[SignalRow]) -> Vec<NaiveDate> {
    signals
        .iter()
        .filter(|s| s.buy.is_some())
        .map(|s| s.date)
        .collect()
}

pub fn sell_dates(signals: &[SignalRow]) -> Vec<NaiveDate> {
    signals
        .iter()
        .filter(|s| s.sell.is_some())
        .map(|s| s.date)
        .collect()
}

/// Position held after the last row.
pub fn final_position(signals: &[SignalRow]) -> Position {
    signals
        .iter()
        .rev()
        .find_map(|s| {
            if s.buy.is_some() {
                Some(Position::Long)
            } else if s.sell.is_some() {
                Some(Position::Flat)
            } else {
                None
            }
        })
        .unwrap_or_default()
}
