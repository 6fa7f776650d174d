//! Report output port trait.

use std::path::Path;

use crate::domain::backtest::{BacktestResult, BacktestSummary};
use crate::domain::baseline::BaselineResult;
use crate::domain::error::CrosstraderError;

/// Port for writing run artifacts as structured records. The domain defines
/// no display formatting; adapters own the shape on disk.
pub trait ReportPort {
    /// Write the full per-day trace of one backtest.
    fn write_backtest(
        &self,
        result: &BacktestResult,
        output_path: &Path,
    ) -> Result<(), CrosstraderError>;

    /// Write a ranked sweep result table.
    fn write_sweep(
        &self,
        summaries: &[BacktestSummary],
        output_path: &Path,
    ) -> Result<(), CrosstraderError>;

    /// Write the baseline per-day profit trace.
    fn write_baseline(
        &self,
        result: &BaselineResult,
        output_path: &Path,
    ) -> Result<(), CrosstraderError>;
}
