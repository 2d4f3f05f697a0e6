//! Effective run settings after merging defaults, config file and CLI flags.

use std::fmt;
use std::path::PathBuf;

use crate::domain::indicator::IndicatorParams;

pub const DEFAULT_PERIOD_YEARS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataSource {
    #[default]
    Yahoo,
    Csv {
        dir: PathBuf,
    },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Yahoo => write!(f, "yahoo"),
            DataSource::Csv { dir } => write!(f, "csv ({})", dir.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub params: IndicatorParams,
    pub source: DataSource,
    /// Trailing history to fetch, in years.
    pub period_years: u32,
    pub chart_output: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            params: IndicatorParams::default(),
            source: DataSource::default(),
            period_years: DEFAULT_PERIOD_YEARS,
            chart_output: None,
        }
    }
}
