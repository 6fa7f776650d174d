//! Brute-force parameter sweep over (fast, slow) window pairs.

use rayon::prelude::*;

use crate::domain::backtest::{run_backtest, BacktestRequest, BacktestSummary};
use crate::domain::error::CrosstraderError;
use crate::domain::series::PriceSeries;

/// Candidate windows for the grid search. Candidates are not deduplicated:
/// repeated values produce repeated result rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRequest {
    pub fast_candidates: Vec<usize>,
    pub slow_candidates: Vec<usize>,
    pub fee_bps: f64,
}

impl SweepRequest {
    pub fn validate(&self) -> Result<(), CrosstraderError> {
        for &w in self.fast_candidates.iter().chain(&self.slow_candidates) {
            if w == 0 {
                return Err(CrosstraderError::NonPositiveWindow { fast: w, slow: w });
            }
        }
        if !(self.fee_bps >= 0.0) {
            return Err(CrosstraderError::NegativeFee {
                fee_bps: self.fee_bps,
            });
        }
        Ok(())
    }

    /// Lazily yields the Cartesian product of the candidate sets, keeping
    /// only pairs with `fast < slow`, in grid order. Invalid pairs are not
    /// errors; they are simply absent.
    pub fn valid_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.fast_candidates.iter().flat_map(move |&fast| {
            self.slow_candidates
                .iter()
                .filter(move |&&slow| fast < slow)
                .map(move |&slow| (fast, slow))
        })
    }
}

/// Run one backtest per valid (fast, slow) pair and rank the results.
///
/// Cells are independent (they share only the read-only series), so they
/// are mapped in parallel. A cell whose slow window the series cannot fill
/// is skipped like an invalid pair. An empty result set is valid.
pub fn sweep(
    series: &PriceSeries,
    request: &SweepRequest,
) -> Result<Vec<BacktestSummary>, CrosstraderError> {
    request.validate()?;

    let pairs: Vec<(usize, usize)> = request.valid_pairs().collect();
    let mut summaries: Vec<BacktestSummary> = pairs
        .par_iter()
        .filter_map(|&(fast, slow)| {
            let cell = BacktestRequest {
                fast,
                slow,
                fee_bps: request.fee_bps,
            };
            run_backtest(series, &cell).ok().map(|r| r.summary)
        })
        .collect();

    rank(&mut summaries);
    Ok(summaries)
}

/// Sort descending by Sharpe, ties broken by descending total return.
/// The sort is stable, so full ties keep grid order and the result is
/// deterministic.
pub fn rank(summaries: &mut [BacktestSummary]) {
    summaries.sort_by(|a, b| {
        b.sharpe
            .total_cmp(&a.sharpe)
            .then(b.total_return.total_cmp(&a.total_return))
    });
}
