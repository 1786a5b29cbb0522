//! Cost-adjusted return accounting.
//!
//! Turns a held-position series and a price series into per-bar raw and
//! strategy returns, compounded into cumulative returns and portfolio value.
//! Yesterday's position is applied against today's return so the series
//! carries no look-ahead. Transaction costs are charged in proportion to the
//! position change at each bar.

use super::signal::Signal;

/// Per-bar derived portfolio state. All series share the bar axis; index 0
/// is the seed row (no prior-position exposure, return zero).
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    /// Price relative change from the prior bar.
    pub raw_returns: Vec<f64>,
    /// Exposure-weighted return net of transaction costs.
    pub strategy_returns: Vec<f64>,
    /// Running product of (1 + strategy_return), seeded at 1.
    pub cumulative_returns: Vec<f64>,
    /// initial_capital × cumulative_return.
    pub portfolio_value: Vec<f64>,
}

/// Compute the cost-adjusted return series.
///
/// `commission_rate` and `slippage_rate` are fractions of notional charged
/// per unit of position change. Prices are assumed validated (positive,
/// ordered) by the data adapter; this function does not re-check them.
pub fn compute_returns(
    prices: &[f64],
    positions: &[Signal],
    commission_rate: f64,
    slippage_rate: f64,
    initial_capital: f64,
) -> ReturnSeries {
    let n = prices.len();
    let mut raw_returns = Vec::with_capacity(n);
    let mut strategy_returns = Vec::with_capacity(n);
    let mut cumulative_returns = Vec::with_capacity(n);
    let mut portfolio_value = Vec::with_capacity(n);

    let cost_rate = commission_rate + slippage_rate;
    let mut cumulative = 1.0;

    for i in 0..n {
        if i == 0 {
            // Seed row: no prior bar, no exposure, no cost.
            raw_returns.push(0.0);
            strategy_returns.push(0.0);
        } else {
            let raw = prices[i] / prices[i - 1] - 1.0;
            let exposure = positions[i - 1] as f64;
            let trade_magnitude = (positions[i] as f64 - positions[i - 1] as f64).abs();
            let cost = trade_magnitude * cost_rate;

            raw_returns.push(raw);
            let net = exposure * raw - cost;
            strategy_returns.push(net);
            cumulative *= 1.0 + net;
        }

        cumulative_returns.push(cumulative);
        portfolio_value.push(initial_capital * cumulative);
    }

    ReturnSeries {
        raw_returns,
        strategy_returns,
        cumulative_returns,
        portfolio_value,
    }
}
