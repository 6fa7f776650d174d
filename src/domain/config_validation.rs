//! Configuration validation.
//!
//! Validates all config fields before a run starts, so a bad file fails
//! fast with a pointed message instead of mid-pipeline.

use chrono::NaiveDate;

use crate::domain::error::CrosstraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    validate_csv_path(config)?;
    validate_date_bounds(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let fast = required_window(config, "backtest", "fast")?;
    let slow = required_window(config, "backtest", "slow")?;
    if fast >= slow {
        return Err(CrosstraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "fast".to_string(),
            reason: format!("fast ({fast}) must be less than slow ({slow})"),
        });
    }
    validate_fee(config, "backtest")?;
    Ok(())
}

pub fn validate_sweep_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    required_windows(config, "sweep", "fast_candidates")?;
    required_windows(config, "sweep", "slow_candidates")?;
    validate_fee(config, "sweep")?;
    Ok(())
}

fn validate_csv_path(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    match config.get_string("data", "csv_path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(CrosstraderError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_path".to_string(),
        }),
    }
}

fn validate_date_bounds(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    date_bounds(config)?;
    Ok(())
}

/// Optional inclusive `[data]` date bounds for the price load.
pub fn date_bounds(
    config: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), CrosstraderError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(CrosstraderError::ConfigInvalid {
                section: "data".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }
    }
    Ok((start, end))
}

fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, CrosstraderError> {
    match config.get_string("data", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map(Some).map_err(|_| {
            CrosstraderError::ConfigInvalid {
                section: "data".to_string(),
                key: key.to_string(),
                reason: format!("invalid {key} format, expected YYYY-MM-DD"),
            }
        }),
    }
}

/// A window length that must be present and positive.
pub fn required_window(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<usize, CrosstraderError> {
    let value = config
        .get_string(section, key)
        .ok_or_else(|| CrosstraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    parse_window(&value).map_err(|reason| CrosstraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    })
}

/// A candidate list that must be present and hold positive windows.
pub fn required_windows(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Vec<usize>, CrosstraderError> {
    let value = config
        .get_string(section, key)
        .ok_or_else(|| CrosstraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    parse_windows(&value).map_err(|reason| CrosstraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    })
}

fn validate_fee(config: &dyn ConfigPort, section: &str) -> Result<(), CrosstraderError> {
    let fee = config.get_double(section, "fee_bps", 0.0);
    if !(fee >= 0.0) {
        return Err(CrosstraderError::ConfigInvalid {
            section: section.to_string(),
            key: "fee_bps".to_string(),
            reason: "fee_bps must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn parse_window(value: &str) -> Result<usize, String> {
    let window: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("not a window length: {value:?}"))?;
    if window == 0 {
        return Err("window length must be positive".to_string());
    }
    Ok(window)
}

/// Parse a comma-separated list of window lengths, e.g. `5, 10, 20`.
/// Repeats are kept: the sweep contract retains duplicate candidates.
pub fn parse_windows(value: &str) -> Result<Vec<usize>, String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(parse_window)
        .collect()
}
