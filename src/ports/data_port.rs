//! Price data access port trait.

use crate::domain::error::BandsigError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait PriceProvider {
    /// Daily bars for `ticker` with dates in `start..=end`, ascending.
    ///
    /// An unknown ticker may yield either `Ok` with an empty series or
    /// `Err(NoData)`; the pipeline treats both as no data.
    fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, BandsigError>;
}
