//! Daily price bars and the single-ticker price series.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Bars for one ticker, ascending by date.
///
/// Gaps (weekends, holidays) are expected and not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, sorting bars by date. Of several bars on one date only
    /// the first given is kept.
    pub fn new(ticker: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        let ticker = ticker.into();
        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        bars.dedup_by_key(|b| b.date);
        if bars.len() < before {
            tracing::warn!(%ticker, dropped = before - bars.len(), "duplicate dates dropped");
        }
        Self { ticker, bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Calendar days between the first and last bar. `None` when empty.
    pub fn span_days(&self) -> Option<i64> {
        Some((self.last_date()? - self.first_date()?).num_days())
    }

    /// Close on `date`, found by binary search over the sorted bars.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| self.bars[i].close)
    }
}
