//! CSV report adapter implementing ReportPort.
//!
//! Emits run artifacts as plain CSV tables: the per-day backtest trace, the
//! ranked sweep summary table, and the baseline profit trace. Flag columns
//! are written as 0/1 so the files load cleanly into any analysis tool.

use std::fs;
use std::path::Path;

use crate::domain::backtest::{BacktestResult, BacktestSummary};
use crate::domain::baseline::BaselineResult;
use crate::domain::error::CrosstraderError;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> CrosstraderError {
    CrosstraderError::Data {
        reason: format!("failed to write {}: {}", path.display(), e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        output_path: &Path,
    ) -> Result<(), CrosstraderError> {
        let file = fs::File::create(output_path).map_err(|e| write_error(output_path, e))?;
        let mut wtr = csv::Writer::from_writer(file);

        wtr.write_record([
            "date", "ret", "ma_fast", "ma_slow", "pos", "pos_lag", "trade", "cost", "strat_ret",
            "bh_ret", "strat_eq", "bh_eq",
        ])
        .map_err(|e| write_error(output_path, e))?;

        for row in &result.trace {
            wtr.write_record([
                row.date.to_string(),
                row.ret.to_string(),
                row.ma_fast.to_string(),
                row.ma_slow.to_string(),
                flag(row.pos).to_string(),
                flag(row.pos_lag).to_string(),
                flag(row.trade).to_string(),
                row.cost.to_string(),
                row.strat_ret.to_string(),
                row.bh_ret.to_string(),
                row.strat_eq.to_string(),
                row.bh_eq.to_string(),
            ])
            .map_err(|e| write_error(output_path, e))?;
        }

        wtr.flush().map_err(|e| write_error(output_path, e))?;
        Ok(())
    }

    fn write_sweep(
        &self,
        summaries: &[BacktestSummary],
        output_path: &Path,
    ) -> Result<(), CrosstraderError> {
        let file = fs::File::create(output_path).map_err(|e| write_error(output_path, e))?;
        let mut wtr = csv::Writer::from_writer(file);

        wtr.write_record([
            "fast",
            "slow",
            "sharpe",
            "total_return",
            "bh_return",
            "max_dd",
            "trades",
            "final_eq",
        ])
        .map_err(|e| write_error(output_path, e))?;

        for s in summaries {
            wtr.write_record([
                s.fast.to_string(),
                s.slow.to_string(),
                s.sharpe.to_string(),
                s.total_return.to_string(),
                s.bh_return.to_string(),
                s.max_dd.to_string(),
                s.trades.to_string(),
                s.final_eq.to_string(),
            ])
            .map_err(|e| write_error(output_path, e))?;
        }

        wtr.flush().map_err(|e| write_error(output_path, e))?;
        Ok(())
    }

    fn write_baseline(
        &self,
        result: &BaselineResult,
        output_path: &Path,
    ) -> Result<(), CrosstraderError> {
        let file = fs::File::create(output_path).map_err(|e| write_error(output_path, e))?;
        let mut wtr = csv::Writer::from_writer(file);

        wtr.write_record(["date", "close", "ma_fast", "ma_slow", "long", "profit", "wealth"])
            .map_err(|e| write_error(output_path, e))?;

        for row in &result.rows {
            wtr.write_record([
                row.date.to_string(),
                row.close.to_string(),
                row.ma_fast.to_string(),
                row.ma_slow.to_string(),
                flag(row.long).to_string(),
                row.profit.to_string(),
                row.wealth.to_string(),
            ])
            .map_err(|e| write_error(output_path, e))?;
        }

        wtr.flush().map_err(|e| write_error(output_path, e))?;
        Ok(())
    }
}
