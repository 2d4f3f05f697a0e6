//! RSI (Relative Strength Index) indicator.
//!
//! Uses simple moving averages of gains and losses (not Wilder's smoothing):
//! - change[i] = close[i] - close[i-1], undefined at i = 0
//! - gain = max(change, 0), loss = max(-change, 0)
//! - avg_gain, avg_loss = mean of the trailing n gains / losses
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 (including a flat window with no gains either).
//!
//! Warmup: first n bars have no RSI (n price changes are needed).

use crate::domain::indicator::stddev::rolling_mean;
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_RSI_WINDOW: usize = 13;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    if bars.is_empty() {
        return Vec::new();
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = bars
        .windows(2)
        .map(|w| {
            let change = w[1].close - w[0].close;
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let avg_gains = rolling_mean(&gains, period);
    let avg_losses = rolling_mean(&losses, period);

    // first bar has no change
    std::iter::once(None)
        .chain(
            avg_gains
                .into_iter()
                .zip(avg_losses)
                .map(|(g, l)| Some(rsi_from_averages(g?, l?))),
        )
        .collect()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}
