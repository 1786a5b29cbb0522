//! Ensemble combination of per-strategy results.
//!
//! Combines two or more results that share a date axis into one synthetic
//! result: the equity curve is the elementwise mean of the component curves,
//! and the combined signal at each bar is the sign of the component signal
//! sum (ties vote flat). Metrics are recomputed from the averaged curve with
//! an empty trade list, so trade-derived fields read as the no-trade
//! sentinels rather than a merge of component trades.

use tracing::debug;

use super::backtest::{BacktestResult, SignalEcho};
use super::error::QuantbtError;
use super::metrics::Metrics;
use super::returns::ReturnSeries;
use super::signal::Signal;

/// Combine component results into one. Requires at least two results with
/// identical date axes.
pub fn combine_results(
    results: &[BacktestResult],
    initial_capital: f64,
) -> Result<BacktestResult, QuantbtError> {
    let [first, rest @ ..] = results else {
        return Err(QuantbtError::NoValidResults);
    };
    if rest.is_empty() {
        return Err(QuantbtError::NoValidResults);
    }
    for other in rest {
        if other.dates != first.dates {
            return Err(QuantbtError::DateAxisMismatch);
        }
    }

    debug!(components = results.len(), bars = first.dates.len(), "combining results");

    let n = results.len() as f64;
    let len = first.dates.len();

    let mut portfolio_value = vec![0.0; len];
    for result in results {
        for (acc, value) in portfolio_value.iter_mut().zip(&result.portfolio_value) {
            *acc += value;
        }
    }
    for value in &mut portfolio_value {
        *value /= n;
    }

    let signals: Vec<Signal> = (0..len)
        .map(|i| {
            let sum: i32 = results.iter().map(|r| i32::from(r.signals.signals[i])).sum();
            sum.signum() as Signal
        })
        .collect();

    let series = series_from_curve(&portfolio_value, initial_capital);
    let metrics = Metrics::compute(&series, &[], initial_capital).rounded();

    let names: Vec<&str> = results.iter().map(|r| r.strategy_name.as_str()).collect();

    Ok(BacktestResult {
        strategy_name: format!("ensemble({})", names.join("+")),
        dates: first.dates.clone(),
        portfolio_value,
        trades: Vec::new(),
        metrics,
        signals: SignalEcho {
            dates: first.dates.clone(),
            prices: first.signals.prices.clone(),
            signals,
        },
    })
}

/// Rebuild a return series from an equity curve. The averaged curve has no
/// raw price stream of its own, so raw and strategy returns coincide.
fn series_from_curve(portfolio_value: &[f64], initial_capital: f64) -> ReturnSeries {
    let n = portfolio_value.len();
    let mut strategy_returns = Vec::with_capacity(n);
    let mut cumulative_returns = Vec::with_capacity(n);

    for i in 0..n {
        if i == 0 {
            strategy_returns.push(0.0);
        } else {
            strategy_returns.push(portfolio_value[i] / portfolio_value[i - 1] - 1.0);
        }
        cumulative_returns.push(portfolio_value[i] / initial_capital);
    }

    ReturnSeries {
        raw_returns: strategy_returns.clone(),
        strategy_returns,
        cumulative_returns,
        portfolio_value: portfolio_value.to_vec(),
    }
}
