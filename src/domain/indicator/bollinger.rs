//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) of Close over n periods
//! - Upper: Middle + (2 × StdDev)
//! - Lower: Middle - (2 × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default period: 30. Warmup: first (period-1) bars have no bands.

use crate::domain::indicator::stddev::{rolling_mean, rolling_sample_stddev};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_BOLLINGER_WINDOW: usize = 30;
pub const BAND_WIDTH_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn calculate_bollinger(bars: &[PriceBar], period: usize) -> Vec<Option<Bands>> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let means = rolling_mean(&closes, period);
    let devs = rolling_sample_stddev(&closes, period);

    means
        .into_iter()
        .zip(devs)
        .map(|(mean, dev)| {
            let (middle, stddev) = (mean?, dev?);
            Some(Bands {
                upper: middle + BAND_WIDTH_MULTIPLIER * stddev,
                middle,
                lower: middle - BAND_WIDTH_MULTIPLIER * stddev,
            })
        })
        .collect()
}
