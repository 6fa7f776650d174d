#![allow(dead_code)]

use chrono::NaiveDate;
use crosstrader::domain::error::CrosstraderError;
use crosstrader::domain::series::{PricePoint, PriceSeries};
use crosstrader::ports::data_port::DataPort;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Build a series of consecutive days starting 2024-01-01.
pub fn make_series(closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
            close,
        })
        .collect();
    PriceSeries::from_points(points).unwrap()
}

/// n constant-price days.
pub fn flat_series(close: f64, days: usize) -> PriceSeries {
    make_series(&vec![close; days])
}

/// Alternating low/high closes; guarantees a crossover trade nearly every
/// day with fast=1, slow=2.
pub fn alternating_series(low: f64, high: f64, days: usize) -> PriceSeries {
    let closes: Vec<f64> = (0..days)
        .map(|i| if i % 2 == 0 { low } else { high })
        .collect();
    make_series(&closes)
}

pub struct MockDataPort {
    pub series: PriceSeries,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(series: PriceSeries) -> Self {
        Self {
            series,
            error: None,
        }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            series: PriceSeries::from_points(vec![]).unwrap(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, CrosstraderError> {
        if let Some(reason) = &self.error {
            return Err(CrosstraderError::Data {
                reason: reason.clone(),
            });
        }
        let points: Vec<PricePoint> = self
            .series
            .points()
            .iter()
            .copied()
            .filter(|p| start_date.is_none_or(|s| p.date >= s))
            .filter(|p| end_date.is_none_or(|e| p.date <= e))
            .collect();
        PriceSeries::from_points(points)
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrosstraderError> {
        if let Some(reason) = &self.error {
            return Err(CrosstraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.series.date_range())
    }
}
