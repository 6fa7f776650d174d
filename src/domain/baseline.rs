//! One-share crossover baseline with per-share profit accounting.
//!
//! Holds one share while the fast average sits above the slow average. The
//! day's profit is the next close minus today's close while long, in price
//! units, summed without compounding and without fees. A simpler yardstick
//! than the compounding engine, kept for comparison runs.

use chrono::NaiveDate;

use crate::domain::backtest::BacktestRequest;
use crate::domain::error::CrosstraderError;
use crate::domain::indicator::RollingMean;
use crate::domain::series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineRow {
    pub date: NaiveDate,
    pub close: f64,
    pub ma_fast: f64,
    pub ma_slow: f64,
    /// One share held through tomorrow when fast > slow today.
    pub long: bool,
    /// Next close minus today's close while long; 0 when flat or on the
    /// final retained day (no next close exists).
    pub profit: f64,
    /// Running sum of profits.
    pub wealth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineResult {
    pub fast: usize,
    pub slow: usize,
    pub rows: Vec<BaselineRow>,
    /// Final wealth: total price-unit profit of the one-share rule.
    pub total_profit: f64,
}

/// Run the one-share baseline.
///
/// Same window validation and insufficient-data contract as the engine;
/// fees do not apply here.
pub fn run_baseline(
    series: &PriceSeries,
    fast: usize,
    slow: usize,
) -> Result<BaselineResult, CrosstraderError> {
    BacktestRequest {
        fast,
        slow,
        fee_bps: 0.0,
    }
    .validate()?;

    let points = series.points();
    let minimum = slow + 1;
    if points.len() < minimum {
        return Err(CrosstraderError::InsufficientData {
            bars: points.len(),
            minimum,
        });
    }

    let mut fast_ma = RollingMean::new(fast);
    let mut slow_ma = RollingMean::new(slow);

    let mut rows: Vec<BaselineRow> = Vec::with_capacity(points.len() + 1 - slow);
    let mut wealth = 0.0;

    for (i, point) in points.iter().enumerate() {
        let ma_fast = fast_ma.push(point.close);
        let ma_slow = slow_ma.push(point.close);

        let (Some(ma_fast), Some(ma_slow)) = (ma_fast, ma_slow) else {
            continue;
        };

        let long = ma_fast > ma_slow;
        let profit = match points.get(i + 1) {
            Some(next) if long => next.close - point.close,
            _ => 0.0,
        };
        wealth += profit;

        rows.push(BaselineRow {
            date: point.date,
            close: point.close,
            ma_fast,
            ma_slow,
            long,
            profit,
            wealth,
        });
    }

    let total_profit = rows.last().map_or(0.0, |r| r.wealth);
    Ok(BaselineResult {
        fast,
        slow,
        rows,
        total_profit,
    })
}
