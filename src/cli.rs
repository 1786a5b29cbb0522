//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::{
    self as backtest_engine, BacktestConfig, DEFAULT_COMMISSION_RATE, DEFAULT_SLIPPAGE_RATE,
};
use crate::domain::error::QuantbtError;
use crate::domain::strategy::{available_strategies, StrategyParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "quantbt", about = "Deterministic backtest engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Write a JSON report here in addition to the stdout summary
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the ticker from the config file
        #[arg(long)]
        ticker: Option<String>,
        /// Resolve and echo the configuration without touching data
        #[arg(long)]
        dry_run: bool,
    },
    /// List registered strategies
    ListStrategies,
    /// Validate a backtest configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the stored data range for ticker(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            ticker,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, ticker.as_deref())
            } else {
                run_backtest(&config, output.as_deref(), ticker.as_deref())
            }
        }
        Command::ListStrategies => run_list_strategies(),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
    }
}

/// Everything a backtest run needs, resolved from one config file.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub csv_dir: PathBuf,
    pub backtest: BacktestConfig,
    pub strategies: Vec<(String, StrategyParams)>,
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

fn fail(err: &QuantbtError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn require_string(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, QuantbtError> {
    adapter
        .get_string(section, key)
        .ok_or_else(|| QuantbtError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn require_date(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<NaiveDate, QuantbtError> {
    let raw = require_string(adapter, section, key)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| QuantbtError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: e.to_string(),
    })
}

pub fn resolve_config(
    adapter: &dyn ConfigPort,
    ticker_override: Option<&str>,
) -> Result<ResolvedConfig, QuantbtError> {
    let csv_dir = PathBuf::from(require_string(adapter, "data", "csv_dir")?);
    let ticker = match ticker_override {
        Some(t) => t.to_string(),
        None => require_string(adapter, "data", "ticker")?,
    };
    let start_date = require_date(adapter, "data", "start_date")?;
    let end_date = require_date(adapter, "data", "end_date")?;
    if end_date < start_date {
        return Err(QuantbtError::ConfigInvalid {
            section: "data".into(),
            key: "end_date".into(),
            reason: format!("{} is before start_date {}", end_date, start_date),
        });
    }

    let backtest = BacktestConfig {
        ticker,
        start_date,
        end_date,
        initial_capital: adapter.get_double("backtest", "initial_capital", 100_000.0),
        commission_rate: adapter.get_double("backtest", "commission_rate", DEFAULT_COMMISSION_RATE),
        slippage_rate: adapter.get_double("backtest", "slippage_rate", DEFAULT_SLIPPAGE_RATE),
    };

    let strategy_list = require_string(adapter, "backtest", "strategies")?;
    let mut strategies = Vec::new();
    for name in strategy_list.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let section = format!("strategy.{}", name);
        let mut params = StrategyParams::new();
        for key in adapter.section_keys(&section) {
            if let Some(value) = adapter.get_string(&section, &key) {
                params.set(key, value);
            }
        }
        strategies.push((name.to_string(), params));
    }
    if strategies.is_empty() {
        return Err(QuantbtError::ConfigInvalid {
            section: "backtest".into(),
            key: "strategies".into(),
            reason: "no strategy names listed".into(),
        });
    }

    Ok(ResolvedConfig {
        csv_dir,
        backtest,
        strategies,
    })
}

fn run_backtest(config_path: &Path, output_path: Option<&Path>, ticker: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let resolved = match resolve_config(&adapter, ticker) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    eprintln!(
        "Fetching {} bars from {}",
        resolved.backtest.ticker,
        resolved.csv_dir.display()
    );
    let data = CsvAdapter::new(resolved.csv_dir.clone());
    let bars = match data.fetch_bars(
        &resolved.backtest.ticker,
        resolved.backtest.start_date,
        resolved.backtest.end_date,
    ) {
        Ok(bars) => bars,
        Err(e) => return fail(&e),
    };
    if bars.is_empty() {
        return fail(&QuantbtError::Data {
            reason: format!(
                "{}: no bars between {} and {}",
                resolved.backtest.ticker, resolved.backtest.start_date, resolved.backtest.end_date
            ),
        });
    }
    info!(bars = bars.len(), "data loaded");

    eprintln!(
        "Running {} strategies over {} bars",
        resolved.strategies.len(),
        bars.len()
    );
    let result =
        match backtest_engine::run_backtest(&bars, &resolved.strategies, &resolved.backtest) {
            Ok(r) => r,
            Err(e) => return fail(&e),
        };

    print_summary(&result, &resolved.backtest);

    if let Some(path) = output_path {
        let path = path.display().to_string();
        if let Err(e) = JsonReportAdapter.write(&result, &resolved.backtest, &path) {
            return fail(&e);
        }
        eprintln!("Report written to {}", path);
    }

    ExitCode::SUCCESS
}

fn print_summary(
    result: &crate::domain::backtest::BacktestResult,
    config: &BacktestConfig,
) {
    let m = &result.metrics;
    println!("Backtest: {} / {}", config.ticker, result.strategy_name);
    println!("Period:   {} to {}", config.start_date, config.end_date);
    println!();
    println!("{:<22} {:>12.2}", "Initial capital", config.initial_capital);
    println!("{:<22} {:>12.2}", "Final value", m.final_value);
    println!("{:<22} {:>11.2}%", "Total return", m.total_return);
    println!("{:<22} {:>11.2}%", "Volatility", m.volatility);
    println!("{:<22} {:>12.2}", "Sharpe ratio", m.sharpe_ratio);
    println!("{:<22} {:>12.2}", "Sortino ratio", m.sortino_ratio);
    println!("{:<22} {:>11.2}%", "Max drawdown", m.max_drawdown);
    println!("{:<22} {:>12}", "Total trades", m.total_trades);
    println!("{:<22} {:>11.2}%", "Win rate", m.win_rate);
    if m.profit_factor.is_finite() {
        println!("{:<22} {:>12.2}", "Profit factor", m.profit_factor);
    } else {
        println!("{:<22} {:>12}", "Profit factor", "inf");
    }
}

fn run_dry_run(config_path: &Path, ticker: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let resolved = match resolve_config(&adapter, ticker) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    println!("Config OK: {}", config_path.display());
    println!("  ticker:          {}", resolved.backtest.ticker);
    println!(
        "  period:          {} to {}",
        resolved.backtest.start_date, resolved.backtest.end_date
    );
    println!("  initial capital: {}", resolved.backtest.initial_capital);
    println!("  commission rate: {}", resolved.backtest.commission_rate);
    println!("  slippage rate:   {}", resolved.backtest.slippage_rate);
    println!("  data dir:        {}", resolved.csv_dir.display());
    for (name, _) in &resolved.strategies {
        println!("  strategy:        {}", name);
    }
    ExitCode::SUCCESS
}

fn run_list_strategies() -> ExitCode {
    for name in available_strategies() {
        println!("{}", name);
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let resolved = match resolve_config(&adapter, None) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    // Unknown names are tolerated at run time (the run proceeds with the
    // survivors) but are a hard error when explicitly validating.
    for (name, _) in &resolved.strategies {
        if !available_strategies().contains(&name.as_str()) {
            return fail(&QuantbtError::UnknownStrategy { name: name.clone() });
        }
    }

    println!(
        "Configuration valid: {} strategies for {}",
        resolved.strategies.len(),
        resolved.backtest.ticker
    );
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, ticker: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let csv_dir = match require_string(&adapter, "data", "csv_dir") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => return fail(&e),
    };
    let data = CsvAdapter::new(csv_dir);

    let tickers = match ticker {
        Some(t) => vec![t.to_string()],
        None => match data.list_tickers() {
            Ok(t) => t,
            Err(e) => return fail(&e),
        },
    };

    for ticker in &tickers {
        match data.data_range(ticker) {
            Ok(Some((first, last, count))) => {
                println!("{:<12} {} to {} ({} bars)", ticker, first, last, count);
            }
            Ok(None) => println!("{:<12} no data", ticker),
            Err(e) => return fail(&e),
        }
    }
    ExitCode::SUCCESS
}
