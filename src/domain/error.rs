//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for bandsig.
#[derive(Debug, thiserror::Error)]
pub enum BandsigError {
    #[error("no price data for {ticker}")]
    NoData { ticker: String },

    #[error("ticker symbol must be non-empty letters, digits or . - ^ =")]
    InvalidTicker,

    #[error("price provider error: {reason}")]
    Provider { reason: String },

    #[error("no close price on {date}")]
    MissingPrice { date: NaiveDate },

    #[error("buy/sell signals out of order: {reason}")]
    UnorderedSignals { reason: String },

    #[error("cannot annualize returns: series spans zero calendar days")]
    ZeroElapsedDays,

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("chart rendering failed: {reason}")]
    Chart { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BandsigError {
    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            BandsigError::Io(_) | BandsigError::Chart { .. } => 1,
            BandsigError::ConfigParse { .. } | BandsigError::ConfigInvalid { .. } => 2,
            BandsigError::Provider { .. } => 3,
            BandsigError::NoData { .. }
            | BandsigError::InvalidTicker
            | BandsigError::MissingPrice { .. } => 5,
            BandsigError::ZeroElapsedDays | BandsigError::UnorderedSignals { .. } => 6,
        }
    }
}

impl From<&BandsigError> for std::process::ExitCode {
    fn from(err: &BandsigError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
