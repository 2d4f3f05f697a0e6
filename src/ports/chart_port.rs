//! Chart rendering port trait.

use crate::domain::error::BandsigError;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::signal::SignalRow;

/// Port for drawing Close, bands and buy/sell markers.
pub trait ChartPort {
    fn render(
        &self,
        frame: &IndicatorFrame,
        signals: &[SignalRow],
        title: &str,
    ) -> Result<(), BandsigError>;
}
