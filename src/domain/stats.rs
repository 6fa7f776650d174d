//! Daily return distribution statistics.

use crate::domain::backtest::TRADING_DAYS_PER_YEAR;
use crate::domain::series::PriceSeries;

/// Summary statistics of a daily return sample. Standard deviation is the
/// sample (n - 1) formulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStats {
    pub days: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Daily standard deviation scaled by sqrt(252).
    pub ann_vol: f64,
    pub min: f64,
    pub max: f64,
}

impl ReturnStats {
    /// None for fewer than two observations: a single return has no spread.
    pub fn compute(returns: &[f64]) -> Option<Self> {
        if returns.len() < 2 {
            return None;
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns
            .iter()
            .map(|r| {
                let diff = r - mean;
                diff * diff
            })
            .sum::<f64>()
            / (n - 1.0);
        let std_dev = variance.sqrt();

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &r in returns {
            min = min.min(r);
            max = max.max(r);
        }

        Some(ReturnStats {
            days: returns.len(),
            mean,
            std_dev,
            ann_vol: std_dev * TRADING_DAYS_PER_YEAR.sqrt(),
            min,
            max,
        })
    }
}

/// Simple daily returns: `price[t] / price[t-1] - 1`, one per day after the
/// first observation.
pub fn simple_returns(series: &PriceSeries) -> Vec<f64> {
    series
        .points()
        .windows(2)
        .map(|pair| pair[1].close / pair[0].close - 1.0)
        .collect()
}

/// Continuously-compounded daily returns: `ln(price[t] / price[t-1])`.
pub fn log_returns(series: &PriceSeries) -> Vec<f64> {
    series
        .points()
        .windows(2)
        .map(|pair| (pair[1].close / pair[0].close).ln())
        .collect()
}
