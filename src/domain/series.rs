//! Daily closing-price series.

use chrono::NaiveDate;

use crate::domain::error::CrosstraderError;

/// One trading day's closing observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// An ordered daily price series.
///
/// Dates are strictly increasing (one observation per trading day, no
/// duplicates) and every close is positive and finite. The constructor
/// enforces both, so downstream code never re-checks.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn from_points(points: Vec<PricePoint>) -> Result<Self, CrosstraderError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CrosstraderError::Data {
                    reason: format!(
                        "dates must be strictly increasing: {} follows {}",
                        pair[1].date, pair[0].date
                    ),
                });
            }
        }
        for p in &points {
            if !p.close.is_finite() || p.close <= 0.0 {
                return Err(CrosstraderError::Data {
                    reason: format!("close on {} must be positive, got {}", p.date, p.close),
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last date plus observation count, if any data exists.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate, usize)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, self.points.len())),
            _ => None,
        }
    }
}
