//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, BacktestRequest};
use crate::domain::baseline::run_baseline;
use crate::domain::config_validation::{
    self, validate_backtest_config, validate_data_config, validate_sweep_config,
};
use crate::domain::error::CrosstraderError;
use crate::domain::series::PriceSeries;
use crate::domain::stats::{log_returns, simple_returns, ReturnStats};
use crate::domain::sweep::{sweep, SweepRequest};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "crosstrader", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single crossover backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the fast window from the config
        #[arg(long)]
        fast: Option<usize>,
        /// Override the slow window from the config
        #[arg(long)]
        slow: Option<usize>,
        /// Override the fee (basis points per position change)
        #[arg(long)]
        fee_bps: Option<f64>,
        /// Write the full per-day trace to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sweep (fast, slow) window pairs and rank by Sharpe
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        fee_bps: Option<f64>,
        /// Write the full ranked table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// How many rows of the ranking to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Run the one-share baseline profit accounting
    Baseline {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        fast: Option<usize>,
        #[arg(long)]
        slow: Option<usize>,
        /// Write the per-day baseline trace to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show daily return distribution statistics
    Stats {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range behind a config
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            fast,
            slow,
            fee_bps,
            output,
        } => run_backtest_command(&config, fast, slow, fee_bps, output.as_deref()),
        Command::Sweep {
            config,
            fee_bps,
            output,
            top,
        } => run_sweep_command(&config, fee_bps, output.as_deref(), top),
        Command::Baseline {
            config,
            fast,
            slow,
            output,
        } => run_baseline_command(&config, fast, slow, output.as_deref()),
        Command::Stats { config } => run_stats_command(&config),
        Command::Info { config } => run_info_command(&config),
        Command::Validate { config } => run_validate_command(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = CrosstraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Resolve the backtest request: CLI overrides win over config values.
pub fn build_backtest_request(
    config: &dyn ConfigPort,
    fast: Option<usize>,
    slow: Option<usize>,
    fee_bps: Option<f64>,
) -> Result<BacktestRequest, CrosstraderError> {
    let fast = match fast {
        Some(v) => v,
        None => config_validation::required_window(config, "backtest", "fast")?,
    };
    let slow = match slow {
        Some(v) => v,
        None => config_validation::required_window(config, "backtest", "slow")?,
    };
    let fee_bps = fee_bps.unwrap_or_else(|| config.get_double("backtest", "fee_bps", 0.0));
    BacktestRequest::new(fast, slow, fee_bps)
}

/// Resolve the sweep request from the `[sweep]` section, with an optional
/// fee override.
pub fn build_sweep_request(
    config: &dyn ConfigPort,
    fee_bps: Option<f64>,
) -> Result<SweepRequest, CrosstraderError> {
    let fast_candidates =
        config_validation::required_windows(config, "sweep", "fast_candidates")?;
    let slow_candidates =
        config_validation::required_windows(config, "sweep", "slow_candidates")?;
    let fee_bps = fee_bps.unwrap_or_else(|| config.get_double("sweep", "fee_bps", 0.0));
    let request = SweepRequest {
        fast_candidates,
        slow_candidates,
        fee_bps,
    };
    request.validate()?;
    Ok(request)
}

/// Load the price series named by the `[data]` section.
pub fn load_series(config: &dyn ConfigPort) -> Result<PriceSeries, CrosstraderError> {
    validate_data_config(config)?;
    let adapter = CsvAdapter::from_config(config)?;
    let (start, end) = config_validation::date_bounds(config)?;
    adapter.fetch_prices(start, end)
}

fn run_backtest_command(
    config_path: &PathBuf,
    fast: Option<usize>,
    slow: Option<usize>,
    fee_bps: Option<f64>,
    output: Option<&std::path::Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let request = match build_backtest_request(&config, fast, slow, fee_bps) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let series = match load_series(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Loaded {} bars", series.len());

    let result = match run_backtest(&series, &request) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let s = &result.summary;
    eprintln!("\n=== Backtest Summary ===");
    eprintln!("Windows:          fast {} / slow {}", s.fast, s.slow);
    eprintln!("Fee:              {} bps per position change", request.fee_bps);
    eprintln!("Total Return:     {:.2}%", s.total_return * 100.0);
    eprintln!("Buy & Hold:       {:.2}%", s.bh_return * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", s.sharpe);
    eprintln!("Max Drawdown:     {:.1}%", s.max_dd * 100.0);
    eprintln!("Trades:           {}", s.trades);
    eprintln!("Final Equity:     {:.4}", s.final_eq);

    if let Some(path) = output {
        if let Err(e) = CsvReportAdapter.write_backtest(&result, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("\nTrace written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_sweep_command(
    config_path: &PathBuf,
    fee_bps: Option<f64>,
    output: Option<&std::path::Path>,
    top: usize,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let request = match build_sweep_request(&config, fee_bps) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let series = match load_series(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let cells = request.valid_pairs().count();
    eprintln!(
        "Sweeping {} window pairs over {} bars...",
        cells,
        series.len()
    );

    let summaries = match sweep(&series, &request) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if summaries.is_empty() {
        eprintln!("No valid window pairs produced a result");
        return ExitCode::SUCCESS;
    }

    eprintln!("\n=== Sweep Results (top {}) ===", top.min(summaries.len()));
    eprintln!(
        "{:>6} {:>6} {:>8} {:>10} {:>8} {:>7}",
        "fast", "slow", "sharpe", "return", "max_dd", "trades"
    );
    for s in summaries.iter().take(top) {
        eprintln!(
            "{:>6} {:>6} {:>8.2} {:>9.2}% {:>7.1}% {:>7}",
            s.fast,
            s.slow,
            s.sharpe,
            s.total_return * 100.0,
            s.max_dd * 100.0,
            s.trades
        );
    }

    if let Some(path) = output {
        if let Err(e) = CsvReportAdapter.write_sweep(&summaries, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("\nFull table written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_baseline_command(
    config_path: &PathBuf,
    fast: Option<usize>,
    slow: Option<usize>,
    output: Option<&std::path::Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    // Baseline shares the engine's window parameters; fees do not apply.
    let request = match build_backtest_request(&config, fast, slow, Some(0.0)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let series = match load_series(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let result = match run_baseline(&series, request.fast, request.slow) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let days_long = result.rows.iter().filter(|r| r.long).count();
    eprintln!("\n=== Baseline Summary ===");
    eprintln!(
        "Windows:          fast {} / slow {}",
        result.fast, result.slow
    );
    eprintln!("Days in market:   {} of {}", days_long, result.rows.len());
    eprintln!("Total Profit:     {:.2} (price units per share)", result.total_profit);

    if let Some(path) = output {
        if let Err(e) = CsvReportAdapter.write_baseline(&result, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("\nTrace written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_stats_command(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let series = match load_series(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let simple = ReturnStats::compute(&simple_returns(&series));
    let log = ReturnStats::compute(&log_returns(&series));

    let (Some(simple), Some(log)) = (simple, log) else {
        eprintln!("error: need at least 3 bars for return statistics");
        let err = CrosstraderError::InsufficientData {
            bars: series.len(),
            minimum: 3,
        };
        return (&err).into();
    };

    eprintln!("\n=== Daily Return Statistics ===");
    print_stats("Simple", &simple);
    print_stats("Log", &log);
    ExitCode::SUCCESS
}

fn print_stats(label: &str, stats: &ReturnStats) {
    eprintln!("{} returns ({} days):", label, stats.days);
    eprintln!("  mean:     {:>10.6}", stats.mean);
    eprintln!("  std dev:  {:>10.6}", stats.std_dev);
    eprintln!("  ann vol:  {:>9.2}%", stats.ann_vol * 100.0);
    eprintln!("  min/max:  {:>10.6} / {:.6}", stats.min, stats.max);
}

fn run_info_command(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let csv_path = config
        .get_string("data", "csv_path")
        .unwrap_or_default();
    let adapter = match CsvAdapter::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match adapter.data_range() {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", csv_path, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", csv_path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate_command(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("[data] section is valid");

    let has_backtest = config.get_string("backtest", "fast").is_some()
        || config.get_string("backtest", "slow").is_some();
    if has_backtest {
        if let Err(e) = validate_backtest_config(&config) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("[backtest] section is valid");
    }

    let has_sweep = config.get_string("sweep", "fast_candidates").is_some()
        || config.get_string("sweep", "slow_candidates").is_some();
    if has_sweep {
        if let Err(e) = validate_sweep_config(&config) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("[sweep] section is valid");
    }

    if !has_backtest && !has_sweep {
        eprintln!("warning: no [backtest] or [sweep] section found");
    }

    eprintln!("Configuration is valid");
    ExitCode::SUCCESS
}
