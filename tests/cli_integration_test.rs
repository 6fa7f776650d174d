//! CLI integration tests for config resolution and command orchestration.
//!
//! Tests cover:
//! - Request building from INI files (overrides win over config values)
//! - Series loading through the `[data]` section with date bounds
//! - Full command runs against real files on disk

use chrono::NaiveDate;
use crosstrader::adapters::file_config_adapter::FileConfigAdapter;
use crosstrader::cli::{self, Cli, Command};
use crosstrader::domain::error::CrosstraderError;
use std::io::Write;
use std::path::PathBuf;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// 60 days of wavy prices starting 2024-01-01.
fn write_temp_csv(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("prices.csv");
    let mut content = String::from("Date,Close\n");
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for i in 0..60 {
        let date = start + chrono::Duration::days(i);
        let close = 100.0 + 10.0 * ((i as f64) * 0.35).sin();
        content.push_str(&format!("{},{:.4}\n", date, close));
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn full_ini(csv_path: &std::path::Path) -> String {
    format!(
        r#"
[data]
csv_path = {}

[backtest]
fast = 3
slow = 10
fee_bps = 10.0

[sweep]
fast_candidates = 2, 3, 5
slow_candidates = 10, 20
fee_bps = 5.0
"#,
        csv_path.display()
    )
}

fn exit_ok(code: std::process::ExitCode) -> bool {
    format!("{code:?}").contains("0")
}

mod request_building {
    use super::*;

    const INI: &str = "[backtest]\nfast = 10\nslow = 50\nfee_bps = 12.5\n";

    #[test]
    fn backtest_request_from_config() {
        let config = FileConfigAdapter::from_string(INI).unwrap();
        let request = cli::build_backtest_request(&config, None, None, None).unwrap();
        assert_eq!(request.fast, 10);
        assert_eq!(request.slow, 50);
        assert_eq!(request.fee_bps, 12.5);
    }

    #[test]
    fn overrides_win_over_config() {
        let config = FileConfigAdapter::from_string(INI).unwrap();
        let request =
            cli::build_backtest_request(&config, Some(5), Some(20), Some(0.0)).unwrap();
        assert_eq!(request.fast, 5);
        assert_eq!(request.slow, 20);
        assert_eq!(request.fee_bps, 0.0);
    }

    #[test]
    fn missing_window_is_config_missing() {
        let config = FileConfigAdapter::from_string("[backtest]\nfast = 10\n").unwrap();
        let err = cli::build_backtest_request(&config, None, None, None).unwrap_err();
        assert!(matches!(err, CrosstraderError::ConfigMissing { .. }));
    }

    #[test]
    fn override_can_replace_missing_config_value() {
        let config = FileConfigAdapter::from_string("[backtest]\nfast = 10\n").unwrap();
        let request = cli::build_backtest_request(&config, None, Some(50), None).unwrap();
        assert_eq!(request.slow, 50);
        // fee_bps falls back to 0 when absent everywhere.
        assert_eq!(request.fee_bps, 0.0);
    }

    #[test]
    fn inverted_windows_rejected_at_build() {
        let config = FileConfigAdapter::from_string(INI).unwrap();
        let err = cli::build_backtest_request(&config, Some(60), None, None).unwrap_err();
        assert!(matches!(err, CrosstraderError::WindowOrder { .. }));
    }

    #[test]
    fn sweep_request_from_config() {
        let config = FileConfigAdapter::from_string(
            "[sweep]\nfast_candidates = 2,3,5\nslow_candidates = 10, 20\nfee_bps = 5\n",
        )
        .unwrap();
        let request = cli::build_sweep_request(&config, None).unwrap();
        assert_eq!(request.fast_candidates, vec![2, 3, 5]);
        assert_eq!(request.slow_candidates, vec![10, 20]);
        assert_eq!(request.fee_bps, 5.0);
    }

    #[test]
    fn sweep_fee_override() {
        let config = FileConfigAdapter::from_string(
            "[sweep]\nfast_candidates = 2\nslow_candidates = 10\nfee_bps = 5\n",
        )
        .unwrap();
        let request = cli::build_sweep_request(&config, Some(25.0)).unwrap();
        assert_eq!(request.fee_bps, 25.0);
    }

    #[test]
    fn sweep_requires_candidate_lists() {
        let config =
            FileConfigAdapter::from_string("[sweep]\nfast_candidates = 2\n").unwrap();
        let err = cli::build_sweep_request(&config, None).unwrap_err();
        assert!(matches!(err, CrosstraderError::ConfigMissing { .. }));
    }
}

mod series_loading {
    use super::*;

    #[test]
    fn loads_series_from_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = write_temp_csv(&dir);
        let config = FileConfigAdapter::from_string(&full_ini(&csv_path)).unwrap();

        let series = cli::load_series(&config).unwrap();
        assert_eq!(series.len(), 60);
    }

    #[test]
    fn date_bounds_apply() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = write_temp_csv(&dir);
        let ini = format!(
            "[data]\ncsv_path = {}\nstart_date = 2024-01-10\nend_date = 2024-01-19\n",
            csv_path.display()
        );
        let config = FileConfigAdapter::from_string(&ini).unwrap();

        let series = cli::load_series(&config).unwrap();
        assert_eq!(series.len(), 10);
    }

    #[test]
    fn missing_csv_path_fails() {
        let config = FileConfigAdapter::from_string("[data]\n").unwrap();
        let err = cli::load_series(&config).unwrap_err();
        assert!(matches!(err, CrosstraderError::ConfigMissing { .. }));
    }

    #[test]
    fn missing_file_fails() {
        let config =
            FileConfigAdapter::from_string("[data]\ncsv_path = /nonexistent/prices.csv\n")
                .unwrap();
        let err = cli::load_series(&config).unwrap_err();
        assert!(matches!(err, CrosstraderError::Data { .. }));
    }
}

mod commands {
    use super::*;

    #[test]
    fn backtest_command_succeeds_and_writes_trace() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = write_temp_csv(&dir);
        let ini = write_temp_ini(&full_ini(&csv_path));
        let trace_path = dir.path().join("trace.csv");

        let code = cli::run(Cli {
            command: Command::Backtest {
                config: ini.path().to_path_buf(),
                fast: None,
                slow: None,
                fee_bps: None,
                output: Some(trace_path.clone()),
            },
        });
        assert!(exit_ok(code), "expected success, got {code:?}");

        let content = std::fs::read_to_string(&trace_path).unwrap();
        // 60 bars, slow window 10: a header plus 51 trace rows.
        assert_eq!(content.lines().count(), 52);
    }

    #[test]
    fn backtest_command_rejects_inverted_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = write_temp_csv(&dir);
        let ini = write_temp_ini(&full_ini(&csv_path));

        let code = cli::run(Cli {
            command: Command::Backtest {
                config: ini.path().to_path_buf(),
                fast: Some(40),
                slow: Some(10),
                fee_bps: None,
                output: None,
            },
        });
        assert!(!exit_ok(code), "expected validation failure");
    }

    #[test]
    fn sweep_command_writes_ranked_table() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = write_temp_csv(&dir);
        let ini = write_temp_ini(&full_ini(&csv_path));
        let out_path = dir.path().join("sweep.csv");

        let code = cli::run(Cli {
            command: Command::Sweep {
                config: ini.path().to_path_buf(),
                fee_bps: None,
                output: Some(out_path.clone()),
                top: 5,
            },
        });
        assert!(exit_ok(code), "expected success, got {code:?}");

        let content = std::fs::read_to_string(&out_path).unwrap();
        // Valid pairs: (2,10) (2,20) (3,10) (3,20) (5,10) (5,20).
        assert_eq!(content.lines().count(), 7);
        assert!(content.starts_with("fast,slow,sharpe"));
    }

    #[test]
    fn baseline_command_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = write_temp_csv(&dir);
        let ini = write_temp_ini(&full_ini(&csv_path));

        let code = cli::run(Cli {
            command: Command::Baseline {
                config: ini.path().to_path_buf(),
                fast: None,
                slow: None,
                output: None,
            },
        });
        assert!(exit_ok(code), "expected success, got {code:?}");
    }

    #[test]
    fn stats_command_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = write_temp_csv(&dir);
        let ini = write_temp_ini(&full_ini(&csv_path));

        let code = cli::run(Cli {
            command: Command::Stats {
                config: ini.path().to_path_buf(),
            },
        });
        assert!(exit_ok(code), "expected success, got {code:?}");
    }

    #[test]
    fn info_command_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = write_temp_csv(&dir);
        let ini = write_temp_ini(&full_ini(&csv_path));

        let code = cli::run(Cli {
            command: Command::Info {
                config: ini.path().to_path_buf(),
            },
        });
        assert!(exit_ok(code), "expected success, got {code:?}");
    }

    #[test]
    fn validate_command_accepts_full_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = write_temp_csv(&dir);
        let ini = write_temp_ini(&full_ini(&csv_path));

        let code = cli::run(Cli {
            command: Command::Validate {
                config: ini.path().to_path_buf(),
            },
        });
        assert!(exit_ok(code), "expected success, got {code:?}");
    }

    #[test]
    fn validate_command_rejects_bad_windows() {
        let ini = write_temp_ini(
            "[data]\ncsv_path = prices.csv\n\n[backtest]\nfast = 50\nslow = 10\n",
        );

        let code = cli::run(Cli {
            command: Command::Validate {
                config: ini.path().to_path_buf(),
            },
        });
        assert!(!exit_ok(code), "expected validation failure");
    }

    #[test]
    fn missing_config_file_fails() {
        let code = cli::run(Cli {
            command: Command::Info {
                config: PathBuf::from("/nonexistent/config.ini"),
            },
        });
        assert!(!exit_ok(code), "expected failure for missing config");
    }

    #[test]
    fn insufficient_data_fails_cleanly() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = dir.path().join("short.csv");
        std::fs::write(
            &csv_path,
            "Date,Close\n2024-01-01,100.0\n2024-01-02,101.0\n2024-01-03,102.0\n",
        )
        .unwrap();
        let ini = write_temp_ini(&format!(
            "[data]\ncsv_path = {}\n\n[backtest]\nfast = 3\nslow = 10\n",
            csv_path.display()
        ));

        let code = cli::run(Cli {
            command: Command::Backtest {
                config: ini.path().to_path_buf(),
                fast: None,
                slow: None,
                fee_bps: None,
                output: None,
            },
        });
        assert!(!exit_ok(code), "expected insufficient-data failure");
    }
}
