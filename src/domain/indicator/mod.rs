//! Technical indicator implementations.
//!
//! This module provides:
//! - `IndicatorParams`: window sizes for the band and oscillator calculations
//! - `IndicatorRow`: one bar's Close plus its derived values
//! - `IndicatorFrame`: the full series of rows, aligned 1:1 with the input bars
//!
//! Values that cannot be computed (warmup rows) are `None`, never NaN, so a
//! comparison against them can't accidentally succeed.

pub mod bollinger;
pub mod rsi;
pub mod stddev;

use chrono::NaiveDate;
use std::fmt;

use crate::domain::ohlcv::PriceSeries;
use bollinger::{calculate_bollinger, DEFAULT_BOLLINGER_WINDOW};
use rsi::{calculate_rsi, DEFAULT_RSI_WINDOW};

pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorParams {
    pub bollinger_window: usize,
    pub rsi_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            bollinger_window: DEFAULT_BOLLINGER_WINDOW,
            rsi_window: DEFAULT_RSI_WINDOW,
        }
    }
}

impl fmt::Display for IndicatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BOLLINGER({}) RSI({})",
            self.bollinger_window, self.rsi_window
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub upper_band: Option<f64>,
    pub middle_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub rsi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub ticker: String,
    pub params: IndicatorParams,
    /// Reference line, constant across rows.
    pub overbought: f64,
    /// Reference line, constant across rows.
    pub oversold: f64,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first row where both bands and RSI are defined.
    pub fn first_complete_row(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.upper_band.is_some() && r.lower_band.is_some() && r.rsi.is_some())
    }
}

/// Compute bands and RSI for every bar of `series`.
pub fn compute_frame(series: &PriceSeries, params: IndicatorParams) -> IndicatorFrame {
    let bands = calculate_bollinger(&series.bars, params.bollinger_window);
    let rsi = calculate_rsi(&series.bars, params.rsi_window);

    let rows = series
        .bars
        .iter()
        .zip(bands)
        .zip(rsi)
        .map(|((bar, band), rsi)| IndicatorRow {
            date: bar.date,
            close: bar.close,
            upper_band: band.map(|b| b.upper),
            middle_band: band.map(|b| b.middle),
            lower_band: band.map(|b| b.lower),
            rsi,
        })
        .collect();

    IndicatorFrame {
        ticker: series.ticker.clone(),
        params,
        overbought: OVERBOUGHT,
        oversold: OVERSOLD,
        rows,
    }
}
