//! End-to-end run for one ticker: fetch, compute, chart, report.
//!
//! All I/O goes through [`PriceProvider`] and [`ChartPort`], so the whole
//! pipeline runs in tests without network access.

use chrono::{Months, NaiveDate};

use crate::domain::error::BandsigError;
use crate::domain::indicator::{compute_frame, IndicatorFrame, IndicatorParams};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::returns::{compute_returns, ReturnSummary};
use crate::domain::signal::{buy_dates, generate_signals, sell_dates, SignalRow};
use crate::ports::chart_port::ChartPort;
use crate::ports::data_port::PriceProvider;

#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub ticker: String,
    pub params: IndicatorParams,
    pub period_years: u32,
    /// Last calendar day of the fetch window, usually today.
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub ticker: String,
    pub series: PriceSeries,
    pub frame: IndicatorFrame,
    pub signals: Vec<SignalRow>,
    pub summary: ReturnSummary,
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}

/// Trim and uppercase a ticker symbol.
///
/// Symbols such as `BRK-B`, `BHP.AX`, `^GSPC` and `EURUSD=X` are accepted.
/// Anything else would alter the request path and is rejected.
pub fn normalize_ticker(raw: &str) -> Result<String, BandsigError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() || !ticker.chars().all(is_symbol_char) {
        return Err(BandsigError::InvalidTicker);
    }
    Ok(ticker)
}

/// First day of a trailing window of `years` ending on `end`.
pub fn lookback_start(end: NaiveDate, years: u32) -> NaiveDate {
    end.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

pub fn chart_title(ticker: &str) -> String {
    format!("{} Bollinger + RSI", ticker)
}

pub fn run_pipeline(
    provider: &dyn PriceProvider,
    chart: Option<&dyn ChartPort>,
    request: &PipelineRequest,
) -> Result<PipelineOutcome, BandsigError> {
    let ticker = normalize_ticker(&request.ticker)?;
    let start = lookback_start(request.end_date, request.period_years);

    tracing::info!(%ticker, %start, end = %request.end_date, "fetching daily prices");
    let series = provider.fetch_daily(&ticker, start, request.end_date)?;
    if series.is_empty() {
        return Err(BandsigError::NoData { ticker });
    }
    tracing::info!(bars = series.len(), "price data loaded");

    let frame = compute_frame(&series, request.params);
    match frame.first_complete_row() {
        Some(i) => tracing::info!(params = %request.params, first_row = %frame.rows[i].date, "indicators computed"),
        None => tracing::warn!(
            params = %request.params,
            bars = series.len(),
            "series shorter than indicator windows, no signals possible"
        ),
    }

    let signals = generate_signals(&frame);
    let buys = buy_dates(&signals);
    let sells = sell_dates(&signals);
    tracing::info!(buys = buys.len(), sells = sells.len(), "signals generated");

    if let Some(chart) = chart {
        chart.render(&frame, &signals, &chart_title(&ticker))?;
    }

    let summary = compute_returns(&buys, &sells, &series)?;
    for trade in &summary.trades {
        tracing::debug!(
            entry = %trade.entry_date,
            exit = %trade.exit_date,
            entry_price = trade.entry_price,
            exit_price = trade.exit_price,
            days = trade.holding_days(),
            ret = trade.trade_return(),
            "closed trade"
        );
    }

    Ok(PipelineOutcome {
        ticker,
        series,
        frame,
        signals,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize_ticker("  aapl \n").unwrap(), "AAPL");
        assert_eq!(normalize_ticker("brk-b").unwrap(), "BRK-B");
    }

    #[test]
    fn normalize_rejects_blank() {
        assert!(matches!(normalize_ticker("   "), Err(BandsigError::InvalidTicker)));
    }

    #[test]
    fn normalize_accepts_index_and_fx_symbols() {
        assert_eq!(normalize_ticker("^gspc").unwrap(), "^GSPC");
        assert_eq!(normalize_ticker("eurusd=x").unwrap(), "EURUSD=X");
        assert_eq!(normalize_ticker("bhp.ax").unwrap(), "BHP.AX");
    }

    #[test]
    fn normalize_rejects_url_characters() {
        for raw in ["AAPL?x=1", "AAPL#frag", "../AAPL", "AA PL", "AAPL%20"] {
            assert!(
                matches!(normalize_ticker(raw), Err(BandsigError::InvalidTicker)),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn lookback_three_years() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(
            lookback_start(end, 3),
            NaiveDate::from_ymd_opt(2021, 6, 15).unwrap()
        );
    }

    #[test]
    fn lookback_from_leap_day() {
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            lookback_start(end, 1),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }

    #[test]
    fn chart_title_format() {
        assert_eq!(chart_title("MSFT"), "MSFT Bollinger + RSI");
    }
}
