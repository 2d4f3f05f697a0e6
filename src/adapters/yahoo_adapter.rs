//! Yahoo Finance price adapter.
//!
//! One blocking GET of the v8 chart endpoint per run. No retries.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::domain::error::BandsigError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::PriceProvider;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

pub struct YahooAdapter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, BandsigError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, BandsigError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0")
            .build()
            .map_err(|e| BandsigError::Provider {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        // period2 is exclusive; extend to the end of `end`
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_400;
        format!(
            "{}/v8/finance/chart/{}?interval=1d&period1={}&period2={}",
            self.base_url, ticker, period1, period2
        )
    }
}

impl PriceProvider for YahooAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, BandsigError> {
        let url = self.chart_url(ticker, start, end);
        tracing::debug!(%url, "requesting chart");

        // error bodies are JSON too, so parse before looking at the status
        let body = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.text())
            .map_err(|e| BandsigError::Provider {
                reason: format!("request for {} failed: {}", ticker, e),
            })?;

        let series = parse_chart_response(ticker, &body)?;
        Ok(PriceSeries::new(
            ticker,
            series
                .bars
                .into_iter()
                .filter(|b| b.date >= start && b.date <= end)
                .collect(),
        ))
    }
}

fn parse_chart_response(ticker: &str, body: &str) -> Result<PriceSeries, BandsigError> {
    let response: ChartResponse = serde_json::from_str(body).map_err(|e| BandsigError::Provider {
        reason: format!("unexpected response for {}: {}", ticker, e),
    })?;

    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(BandsigError::NoData {
                ticker: ticker.to_string(),
            });
        }
        return Err(BandsigError::Provider {
            reason: format!("{}: {}", error.code, error.description),
        });
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(BandsigError::NoData {
            ticker: ticker.to_string(),
        });
    };

    let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let Some(quote) = data.indicators.quote.into_iter().next() else {
        return Ok(PriceSeries::new(ticker, Vec::new()));
    };

    let mut bars = Vec::with_capacity(data.timestamp.len());
    for (i, &ts) in data.timestamp.iter().enumerate() {
        let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();
        let date = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive());

        // holidays and halted sessions come back as nulls
        if let (Some(date), Some(open), Some(high), Some(low), Some(close)) = (
            date,
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
        ) {
            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume: volume.unwrap_or(0),
            });
        }
    }

    tracing::info!(ticker, bars = bars.len(), "fetched Yahoo data");
    Ok(PriceSeries::new(ticker, bars))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "chart": {
        "result": [{
          "meta": {"symbol": "AAPL", "gmtoffset": -14400},
          "timestamp": [1704205800, 1704292200, 1704378600],
          "indicators": {
            "quote": [{
              "open":   [187.15, null, 182.15],
              "high":   [188.44, null, 183.09],
              "low":    [183.89, null, 180.88],
              "close":  [185.64, null, 181.91],
              "volume": [82488700, null, 71983600]
            }]
          }
        }],
        "error": null
      }
    }"#;

    #[test]
    fn parses_bars_and_skips_nulls() {
        let series = parse_chart_response("AAPL", SAMPLE).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.bars[0].close, 185.64);
        assert_eq!(series.bars[0].volume, 82_488_700);
        assert_eq!(series.bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn not_found_is_no_data() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart_response("NOPE", body).unwrap_err();
        assert!(matches!(err, BandsigError::NoData { ticker } if ticker == "NOPE"));
    }

    #[test]
    fn other_api_error_is_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        let err = parse_chart_response("AAPL", body).unwrap_err();
        assert!(matches!(err, BandsigError::Provider { reason } if reason.contains("Invalid input")));
    }

    #[test]
    fn empty_result_is_no_data() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        let err = parse_chart_response("AAPL", body).unwrap_err();
        assert!(matches!(err, BandsigError::NoData { .. }));
    }

    #[test]
    fn missing_timestamps_gives_empty_series() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let series = parse_chart_response("AAPL", body).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn garbage_body_is_provider_error() {
        let err = parse_chart_response("AAPL", "<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, BandsigError::Provider { .. }));
    }

    #[test]
    fn chart_url_has_daily_interval_and_range() {
        let adapter = YahooAdapter::with_base_url("http://localhost:1/").unwrap();
        let url = adapter.chart_url(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        assert_eq!(
            url,
            "http://localhost:1/v8/finance/chart/AAPL?interval=1d&period1=1704067200&period2=1704240000"
        );
    }

    #[test]
    #[ignore]
    fn fetch_live_data() {
        let adapter = YahooAdapter::new().unwrap();
        let end = chrono::Local::now().date_naive();
        let series = adapter
            .fetch_daily("AAPL", end - chrono::Duration::days(30), end)
            .unwrap();
        assert!(!series.is_empty());
    }
}
