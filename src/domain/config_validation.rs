//! Configuration validation.
//!
//! `validate_config` checks raw INI values before they are merged;
//! `validate_settings` checks the merged result, which may carry CLI overrides.

use crate::domain::error::BandsigError;
use crate::domain::settings::{DataSource, RunSettings};
use crate::ports::config_port::ConfigPort;

pub const MIN_BOLLINGER_WINDOW: usize = 2;
pub const MIN_RSI_WINDOW: usize = 1;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), BandsigError> {
    let max_window = i64::try_from(usize::MAX).unwrap_or(i64::MAX);
    validate_int_in_range(
        config,
        "indicators",
        "bollinger_window",
        MIN_BOLLINGER_WINDOW as i64,
        max_window,
    )?;
    validate_int_in_range(config, "indicators", "rsi_window", MIN_RSI_WINDOW as i64, max_window)?;
    validate_int_in_range(config, "data", "period_years", 1, i64::from(u32::MAX))?;
    validate_source(config)?;
    Ok(())
}

pub fn validate_settings(settings: &RunSettings) -> Result<(), BandsigError> {
    if settings.params.bollinger_window < MIN_BOLLINGER_WINDOW {
        return Err(invalid(
            "indicators",
            "bollinger_window",
            format!("must be at least {}", MIN_BOLLINGER_WINDOW),
        ));
    }
    if settings.params.rsi_window < MIN_RSI_WINDOW {
        return Err(invalid(
            "indicators",
            "rsi_window",
            format!("must be at least {}", MIN_RSI_WINDOW),
        ));
    }
    if settings.period_years == 0 {
        return Err(invalid("data", "period_years", "must be at least 1".into()));
    }
    if let DataSource::Csv { dir } = &settings.source {
        if dir.as_os_str().is_empty() {
            return Err(invalid("data", "csv_dir", "csv source requires csv_dir".into()));
        }
    }
    Ok(())
}

fn validate_int_in_range(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    minimum: i64,
    maximum: i64,
) -> Result<(), BandsigError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v < minimum => Err(invalid(section, key, format!("must be at least {}", minimum))),
        Ok(v) if v > maximum => Err(invalid(section, key, format!("must be at most {}", maximum))),
        Ok(_) => Ok(()),
        Err(_) => Err(invalid(section, key, format!("'{}' is not an integer", raw))),
    }
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), BandsigError> {
    let source = config
        .get_string("data", "source")
        .map(|s| s.trim().to_lowercase());
    match source.as_deref() {
        None | Some("yahoo") => Ok(()),
        Some("csv") => match config.get_string("data", "csv_dir") {
            Some(dir) if !dir.trim().is_empty() => Ok(()),
            _ => Err(invalid("data", "csv_dir", "csv source requires csv_dir".into())),
        },
        Some(other) => Err(invalid(
            "data",
            "source",
            format!("unknown source '{}', expected yahoo or csv", other),
        )),
    }
}

fn invalid(section: &str, key: &str, reason: String) -> BandsigError {
    BandsigError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}
