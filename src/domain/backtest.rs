//! Moving-average crossover backtest engine.
//!
//! Pure function of (price series, request): one pass over the series
//! produces a per-day trace and a scalar summary. The position only ever
//! holds 0 or 1 unit.

use chrono::NaiveDate;

use crate::domain::error::CrosstraderError;
use crate::domain::indicator::RollingMean;
use crate::domain::series::PriceSeries;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Guards the Sharpe denominator when the strategy never trades and the
/// daily-return series has zero variance.
const SHARPE_EPSILON: f64 = 1e-12;

/// Parameters for a single crossover backtest.
///
/// `fee_bps` is the cost per position change in basis points
/// (10 = 0.10% = 0.0010 decimal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestRequest {
    pub fast: usize,
    pub slow: usize,
    pub fee_bps: f64,
}

impl BacktestRequest {
    pub fn new(fast: usize, slow: usize, fee_bps: f64) -> Result<Self, CrosstraderError> {
        let request = Self { fast, slow, fee_bps };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), CrosstraderError> {
        if self.fast == 0 || self.slow == 0 {
            return Err(CrosstraderError::NonPositiveWindow {
                fast: self.fast,
                slow: self.slow,
            });
        }
        if self.fast >= self.slow {
            return Err(CrosstraderError::WindowOrder {
                fast: self.fast,
                slow: self.slow,
            });
        }
        if !(self.fee_bps >= 0.0) {
            return Err(CrosstraderError::NegativeFee {
                fee_bps: self.fee_bps,
            });
        }
        Ok(())
    }

    /// Decimal cost charged on each position change.
    pub fn cost_per_trade(&self) -> f64 {
        self.fee_bps / 10_000.0
    }
}

/// One retained day of the backtest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub date: NaiveDate,
    /// Simple return of the close versus the previous close.
    pub ret: f64,
    pub ma_fast: f64,
    pub ma_slow: f64,
    /// Raw signal from today's averages: long when fast > slow, flat on ties.
    pub pos: bool,
    /// Yesterday's signal, the one that actually earns today's return.
    pub pos_lag: bool,
    /// True when today's signal differs from yesterday's.
    pub trade: bool,
    pub cost: f64,
    pub strat_ret: f64,
    pub bh_ret: f64,
    pub strat_eq: f64,
    pub bh_eq: f64,
}

/// Scalar outcome of one backtest; owned by the caller and valid after the
/// trace has been discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestSummary {
    pub fast: usize,
    pub slow: usize,
    pub total_return: f64,
    pub bh_return: f64,
    pub sharpe: f64,
    pub max_dd: f64,
    pub trades: usize,
    pub final_eq: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub summary: BacktestSummary,
    pub trace: Vec<TraceRow>,
}

/// Run one crossover backtest.
///
/// Warm-up rows (no return yet, or either average still undefined) are
/// dropped; the retained region is a contiguous suffix starting at the
/// first day where both averages and the day's return exist. Fewer than
/// `slow + 1` observations cannot produce a retained region and is an
/// [`CrosstraderError::InsufficientData`] error, distinct from a valid
/// zero-trade result.
pub fn run_backtest(
    series: &PriceSeries,
    request: &BacktestRequest,
) -> Result<BacktestResult, CrosstraderError> {
    request.validate()?;

    let points = series.points();
    let minimum = request.slow + 1;
    if points.len() < minimum {
        return Err(CrosstraderError::InsufficientData {
            bars: points.len(),
            minimum,
        });
    }

    let cost_per_trade = request.cost_per_trade();
    let mut fast_ma = RollingMean::new(request.fast);
    let mut slow_ma = RollingMean::new(request.slow);

    let mut trace: Vec<TraceRow> = Vec::with_capacity(points.len() + 1 - request.slow);
    // One-slot delay register: yesterday's signal, written only after the
    // day's return has been consumed. None until the first retained day.
    let mut prev_pos: Option<bool> = None;
    let mut strat_eq = 1.0;
    let mut bh_eq = 1.0;

    for (i, point) in points.iter().enumerate() {
        let ma_fast = fast_ma.push(point.close);
        let ma_slow = slow_ma.push(point.close);

        let (Some(ma_fast), Some(ma_slow)) = (ma_fast, ma_slow) else {
            continue;
        };
        if i == 0 {
            // The first observation has no return.
            continue;
        }

        let ret = point.close / points[i - 1].close - 1.0;
        let pos = ma_fast > ma_slow;

        // The first retained day has no prior signal: flat, and never a trade.
        let (pos_lag, trade) = match prev_pos {
            None => (false, false),
            Some(prev) => (prev, pos != prev),
        };

        let cost = if trade { cost_per_trade } else { 0.0 };
        let strat_ret = if pos_lag { ret } else { 0.0 } - cost;
        let bh_ret = ret;
        strat_eq *= 1.0 + strat_ret;
        bh_eq *= 1.0 + bh_ret;

        trace.push(TraceRow {
            date: point.date,
            ret,
            ma_fast,
            ma_slow,
            pos,
            pos_lag,
            trade,
            cost,
            strat_ret,
            bh_ret,
            strat_eq,
            bh_eq,
        });
        prev_pos = Some(pos);
    }

    let summary = summarize(&trace, request);
    Ok(BacktestResult { summary, trace })
}

fn summarize(trace: &[TraceRow], request: &BacktestRequest) -> BacktestSummary {
    let final_eq = trace.last().map_or(1.0, |r| r.strat_eq);
    let bh_final = trace.last().map_or(1.0, |r| r.bh_eq);

    let n = trace.len() as f64;
    let mean = trace.iter().map(|r| r.strat_ret).sum::<f64>() / n;
    let variance = trace
        .iter()
        .map(|r| {
            let diff = r.strat_ret - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    let sharpe = TRADING_DAYS_PER_YEAR.sqrt() * mean / (variance.sqrt() + SHARPE_EPSILON);

    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for row in trace {
        if row.strat_eq > peak {
            peak = row.strat_eq;
        }
        let dd = row.strat_eq / peak - 1.0;
        if dd < max_dd {
            max_dd = dd;
        }
    }

    let trades = trace.iter().filter(|r| r.trade).count();

    BacktestSummary {
        fast: request.fast,
        slow: request.slow,
        total_return: final_eq - 1.0,
        bh_return: bh_final - 1.0,
        sharpe,
        max_dd,
        trades,
        final_eq,
    }
}
