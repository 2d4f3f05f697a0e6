#![allow(dead_code)]

use bandsig::domain::error::BandsigError;
use bandsig::domain::indicator::IndicatorParams;
pub use bandsig::domain::ohlcv::{PriceBar, PriceSeries};
use bandsig::domain::pipeline::PipelineRequest;
use bandsig::ports::data_port::PriceProvider;
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockPriceProvider {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockPriceProvider {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PriceProvider for MockPriceProvider {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, BandsigError> {
        self.requests
            .borrow_mut()
            .push((ticker.to_string(), start, end));
        if let Some(reason) = self.errors.get(ticker) {
            return Err(BandsigError::Provider {
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start && b.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(PriceSeries::new(ticker, bars))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(n: usize) -> NaiveDate {
    date(2023, 1, 1) + chrono::Duration::days(n as i64)
}

/// One bar per calendar day starting 2023-01-01.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: day(i),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn series_from_closes(ticker: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(ticker, bars_from_closes(closes))
}

/// Windows small enough for hand-built fixtures.
pub fn small_params() -> IndicatorParams {
    IndicatorParams {
        bollinger_window: 10,
        rsi_window: 5,
    }
}

/// 30 quiet days, a six-day slide, a flat base, then a sharp rally.
///
/// With `small_params()` this buys on row 31 at 93.0 and sells on row 48 at 87.0.
pub fn dip_and_rally_closes() -> Vec<f64> {
    let mut closes = Vec::new();
    for i in 0..30 {
        closes.push(if i % 2 == 0 { 101.0 } else { 99.0 });
    }
    let mut p = 99.0;
    for _ in 0..6 {
        p -= 3.0;
        closes.push(p);
    }
    for i in 0..12 {
        closes.push(if i % 2 == 0 { p + 0.5 } else { p - 0.5 });
    }
    for _ in 0..3 {
        p += 6.0;
        closes.push(p);
    }
    for i in 0..4 {
        closes.push(if i % 2 == 0 { p + 0.5 } else { p - 0.5 });
    }
    closes
}

pub const DIP_BUY_ROW: usize = 31;
pub const DIP_SELL_ROW: usize = 48;

pub fn request_for(ticker: &str, end_date: NaiveDate) -> PipelineRequest {
    PipelineRequest {
        ticker: ticker.to_string(),
        params: small_params(),
        period_years: 3,
        end_date,
    }
}
