//! CSV file price adapter.
//!
//! Reads `<base_path>/<TICKER>.csv` with the header
//! `date,open,high,low,close,volume` and dates as `YYYY-MM-DD`.

use crate::domain::error::BandsigError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::PriceProvider;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

impl PriceProvider for CsvAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, BandsigError> {
        let path = self.csv_path(ticker);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BandsigError::NoData {
                    ticker: ticker.to_string(),
                });
            }
            Err(e) => {
                return Err(BandsigError::Provider {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.deserialize::<CsvRecord>() {
            let record = result.map_err(|e| BandsigError::Provider {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d").map_err(|e| {
                BandsigError::Provider {
                    reason: format!("invalid date '{}': {}", record.date, e),
                }
            })?;

            if date < start || date > end {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                volume: record.volume as i64,
            });
        }

        tracing::debug!(path = %path.display(), bars = bars.len(), "read price file");
        Ok(PriceSeries::new(ticker, bars))
    }
}
