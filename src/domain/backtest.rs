//! Backtest orchestration.
//!
//! One strategy run is the pure pipeline signal resolution -> return
//! accounting -> trade extraction -> metrics. Multiple strategies run as
//! independent parallel tasks over the same read-only bar series and join
//! at the ensemble combiner.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use super::bar::{self, Bar};
use super::ensemble;
use super::error::QuantbtError;
use super::metrics::Metrics;
use super::returns::compute_returns;
use super::signal::{resolve_positions, Signal};
use super::strategy::{build_strategy, StrategyParams};
use super::trade::{extract_trades, Trade};

pub const DEFAULT_COMMISSION_RATE: f64 = 0.001;
pub const DEFAULT_SLIPPAGE_RATE: f64 = 0.0005;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    /// Opaque instrument identifier, passed through to output metadata.
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub commission_rate: f64,
    pub slippage_rate: f64,
}

/// The signal series a strategy produced, echoed into the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalEcho {
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
    pub signals: Vec<Signal>,
}

/// Output of one backtest run. Immutable after construction; metrics are
/// rounded at assembly, the value series stays full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub strategy_name: String,
    pub dates: Vec<NaiveDate>,
    pub portfolio_value: Vec<f64>,
    pub trades: Vec<Trade>,
    pub metrics: Metrics,
    pub signals: SignalEcho,
}

/// Run the engine pipeline for one already-generated signal series.
pub fn run_strategy(
    strategy_name: &str,
    signals: Vec<Signal>,
    bars: &[Bar],
    config: &BacktestConfig,
) -> Result<BacktestResult, QuantbtError> {
    if signals.len() != bars.len() {
        return Err(QuantbtError::LengthMismatch {
            signals: signals.len(),
            bars: bars.len(),
        });
    }

    let prices = bar::closes(bars);
    let dates = bar::dates(bars);

    let positions = resolve_positions(&signals);
    let series = compute_returns(
        &prices,
        &positions,
        config.commission_rate,
        config.slippage_rate,
        config.initial_capital,
    );
    let trades = extract_trades(&dates, &prices, &positions);
    let metrics = Metrics::compute(&series, &trades, config.initial_capital).rounded();

    Ok(BacktestResult {
        strategy_name: strategy_name.to_string(),
        dates: dates.clone(),
        portfolio_value: series.portfolio_value,
        trades,
        metrics,
        signals: SignalEcho {
            dates,
            prices,
            signals,
        },
    })
}

/// Run every configured strategy against the same bar series and reduce to
/// a single result.
///
/// Each strategy is an independent task (the runs share no mutable state);
/// a failing strategy is logged and skipped rather than aborting its
/// siblings. With one surviving result it is returned as-is; with several,
/// only the ensemble combination is returned and the per-strategy results
/// stay intermediate.
pub fn run_backtest(
    bars: &[Bar],
    strategies: &[(String, StrategyParams)],
    config: &BacktestConfig,
) -> Result<BacktestResult, QuantbtError> {
    if config.initial_capital <= 0.0 {
        return Err(QuantbtError::InvalidCapital {
            value: config.initial_capital,
        });
    }

    info!(
        ticker = %config.ticker,
        strategies = strategies.len(),
        bars = bars.len(),
        "running backtest"
    );

    let outcomes: Vec<(String, Result<BacktestResult, QuantbtError>)> = strategies
        .par_iter()
        .map(|(name, params)| {
            let result = build_strategy(name, params)
                .map(|strategy| strategy.generate_signals(bars))
                .and_then(|signals| run_strategy(name, signals, bars, config));
            (name.clone(), result)
        })
        .collect();

    let mut results = Vec::new();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => warn!(strategy = %name, error = %e, "strategy failed, skipping"),
        }
    }

    match results.len() {
        0 => Err(QuantbtError::NoValidResults),
        1 => Ok(results.remove(0)),
        _ => ensemble::combine_results(&results, config.initial_capital),
    }
}
