//! CSV price file data adapter.
//!
//! Reads daily closing prices from a CSV file with header-named columns.
//! Rows whose close does not parse as a number are treated as missing and
//! filtered out before the series reaches the domain; rows are sorted by
//! date, and the `PriceSeries` constructor enforces the no-duplicate,
//! positive-close invariants.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::CrosstraderError;
use crate::domain::series::{PricePoint, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_DATE_COLUMN: &str = "Date";
pub const DEFAULT_CLOSE_COLUMN: &str = "Close";

pub struct CsvAdapter {
    path: PathBuf,
    date_column: String,
    close_column: String,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            close_column: DEFAULT_CLOSE_COLUMN.to_string(),
        }
    }

    pub fn with_columns(mut self, date_column: &str, close_column: &str) -> Self {
        self.date_column = date_column.to_string();
        self.close_column = close_column.to_string();
        self
    }

    /// Build from the `[data]` config section: `csv_path` (required),
    /// `date_column` and `close_column` (optional).
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, CrosstraderError> {
        let path = config.get_string("data", "csv_path").ok_or_else(|| {
            CrosstraderError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_path".to_string(),
            }
        })?;

        let date_column = config
            .get_string("data", "date_column")
            .unwrap_or_else(|| DEFAULT_DATE_COLUMN.to_string());
        let close_column = config
            .get_string("data", "close_column")
            .unwrap_or_else(|| DEFAULT_CLOSE_COLUMN.to_string());

        Ok(Self {
            path: PathBuf::from(path),
            date_column,
            close_column,
        })
    }

    fn load_points(&self) -> Result<Vec<PricePoint>, CrosstraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| CrosstraderError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| CrosstraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let date_idx = headers
            .iter()
            .position(|h| h == self.date_column)
            .ok_or_else(|| CrosstraderError::Data {
                reason: format!("missing {} column", self.date_column),
            })?;
        let close_idx = headers
            .iter()
            .position(|h| h == self.close_column)
            .ok_or_else(|| CrosstraderError::Data {
                reason: format!("missing {} column", self.close_column),
            })?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| CrosstraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_idx).ok_or_else(|| CrosstraderError::Data {
                reason: format!("row too short, no {} field", self.date_column),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                CrosstraderError::Data {
                    reason: format!("invalid date {:?}: {}", date_str, e),
                }
            })?;

            // A close that does not parse is a missing observation, not an
            // error: the row is unusable and dropped before the core sees it.
            let close: f64 = match record.get(close_idx).map(str::trim) {
                Some(s) if !s.is_empty() => match s.parse() {
                    Ok(v) => v,
                    Err(_) => continue,
                },
                _ => continue,
            };

            points.push(PricePoint { date, close });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, CrosstraderError> {
        let mut points = self.load_points()?;

        if let Some(start) = start_date {
            points.retain(|p| p.date >= start);
        }
        if let Some(end) = end_date {
            points.retain(|p| p.date <= end);
        }

        PriceSeries::from_points(points)
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrosstraderError> {
        let series = self.fetch_prices(None, None)?;
        Ok(series.date_range())
    }
}
