//! Performance metrics and statistics.
//!
//! Pure function of the return series and closed trade list. Degenerate
//! inputs never fault: zero-variance returns give a 0 ratio, zero trades
//! give a 0 win rate, and zero losing trades give an infinite profit
//! factor (`f64::INFINITY`), which callers must special-case. All values
//! are kept at full precision here; rounding to two decimals happens once,
//! in [`Metrics::rounded`], at report-assembly time.

use serde::Serialize;

use super::returns::ReturnSeries;
use super::trade::Trade;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized benchmark used for the information ratio.
const BENCHMARK_ANNUAL_RETURN: f64 = 0.08;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub max_drawdown: f64,
    pub volatility: f64,
    pub win_rate: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub final_value: f64,
    pub information_ratio: f64,
    pub omega_ratio: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

impl Metrics {
    /// Compute all statistics from a return series and its trade list.
    /// The seed row (bar 0) is excluded from every per-bar calculation.
    pub fn compute(series: &ReturnSeries, trades: &[Trade], initial_capital: f64) -> Self {
        let final_value = series
            .portfolio_value
            .last()
            .copied()
            .unwrap_or(initial_capital);
        let total_return = (final_value / initial_capital - 1.0) * 100.0;

        // Per-bar returns, seed row dropped.
        let returns: &[f64] = if series.strategy_returns.len() > 1 {
            &series.strategy_returns[1..]
        } else {
            &[]
        };

        let ret_mean = mean(returns);
        let ret_std = sample_stddev(returns);

        let sharpe_ratio = if ret_std > 0.0 {
            ret_mean / ret_std * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        };

        let downside: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
        let downside_std = sample_stddev(&downside);
        let sortino_ratio = if downside_std > 0.0 {
            ret_mean / downside_std * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        };

        let max_drawdown = compute_drawdown(&series.cumulative_returns);
        let calmar_ratio = if max_drawdown != 0.0 {
            total_return / max_drawdown.abs()
        } else {
            0.0
        };

        let volatility = ret_std * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;

        let (win_rate, winning_trades, losing_trades, avg_win, avg_loss, profit_factor) =
            trade_statistics(trades);

        let daily_benchmark = BENCHMARK_ANNUAL_RETURN / TRADING_DAYS_PER_YEAR;
        let excess: Vec<f64> = returns.iter().map(|r| r - daily_benchmark).collect();
        let excess_std = sample_stddev(&excess);
        let information_ratio = if excess_std > 0.0 {
            mean(&excess) / excess_std * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        };

        let omega_ratio = compute_omega(returns);
        let (skewness, kurtosis) = standardized_moments(returns);

        Metrics {
            total_return,
            sharpe_ratio,
            sortino_ratio,
            calmar_ratio,
            max_drawdown,
            volatility,
            win_rate,
            total_trades: trades.len(),
            winning_trades,
            losing_trades,
            avg_win,
            avg_loss,
            profit_factor,
            final_value,
            information_ratio,
            omega_ratio,
            skewness,
            kurtosis,
        }
    }

    /// Copy with every float rounded to two decimals. The infinite
    /// profit-factor sentinel survives rounding unchanged.
    pub fn rounded(&self) -> Self {
        Metrics {
            total_return: round2(self.total_return),
            sharpe_ratio: round2(self.sharpe_ratio),
            sortino_ratio: round2(self.sortino_ratio),
            calmar_ratio: round2(self.calmar_ratio),
            max_drawdown: round2(self.max_drawdown),
            volatility: round2(self.volatility),
            win_rate: round2(self.win_rate),
            total_trades: self.total_trades,
            winning_trades: self.winning_trades,
            losing_trades: self.losing_trades,
            avg_win: round2(self.avg_win),
            avg_loss: round2(self.avg_loss),
            profit_factor: round2(self.profit_factor),
            final_value: round2(self.final_value),
            information_ratio: round2(self.information_ratio),
            omega_ratio: round2(self.omega_ratio),
            skewness: round2(self.skewness),
            kurtosis: round2(self.kurtosis),
        }
    }
}

/// Round to two decimal places. Infinities pass through.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator); 0 when fewer than two points.
fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Largest peak-to-trough decline of the cumulative return curve, as a
/// non-positive percentage.
fn compute_drawdown(cumulative: &[f64]) -> f64 {
    let mut running_max = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for &value in cumulative {
        if value > running_max {
            running_max = value;
        }
        let dd = (value - running_max) / running_max;
        if dd < max_dd {
            max_dd = dd;
        }
    }

    max_dd * 100.0
}

fn trade_statistics(trades: &[Trade]) -> (f64, usize, usize, f64, f64, f64) {
    let wins: Vec<f64> = trades.iter().map(|t| t.pnl).filter(|&p| p > 0.0).collect();
    let losses: Vec<f64> = trades.iter().map(|t| t.pnl).filter(|&p| p < 0.0).collect();

    let win_rate = if trades.is_empty() {
        0.0
    } else {
        wins.len() as f64 / trades.len() as f64 * 100.0
    };

    let avg_win = mean(&wins);
    let avg_loss = mean(&losses);

    let profit_factor = if avg_loss != 0.0 {
        (avg_win / avg_loss).abs()
    } else if avg_win > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    (win_rate, wins.len(), losses.len(), avg_win, avg_loss, profit_factor)
}

/// Gains above zero divided by the magnitude of losses below zero, with the
/// same infinite sentinel as the profit factor when no losing bars exist.
fn compute_omega(returns: &[f64]) -> f64 {
    let gains: f64 = returns.iter().filter(|&&r| r > 0.0).sum();
    let losses: f64 = returns.iter().filter(|&&r| r < 0.0).sum();

    if losses != 0.0 {
        gains / losses.abs()
    } else if gains > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Third and fourth standardized moments (population form, excess kurtosis).
fn standardized_moments(returns: &[f64]) -> (f64, f64) {
    let n = returns.len() as f64;
    if returns.len() < 2 {
        return (0.0, 0.0);
    }

    let m = mean(returns);
    let variance = returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / n;
    if variance == 0.0 {
        return (0.0, 0.0);
    }

    let sigma = variance.sqrt();
    let m3 = returns.iter().map(|r| (r - m).powi(3)).sum::<f64>() / n;
    let m4 = returns.iter().map(|r| (r - m).powi(4)).sum::<f64>() / n;

    (m3 / sigma.powi(3), m4 / variance.powi(2) - 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::returns::compute_returns;
    use crate::domain::signal::Signal;
    use crate::domain::trade::{Trade, TradeSide};
    use chrono::NaiveDate;

    fn make_trade(pnl: f64) -> Trade {
        let entry = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Trade {
            entry_date: entry,
            exit_date: entry + chrono::Duration::days(5),
            side: TradeSide::Long,
            entry_price: 100.0,
            exit_price: 100.0 + pnl,
            quantity: 1,
            pnl,
            return_pct: pnl,
        }
    }

    fn series_from(prices: &[f64], positions: &[Signal]) -> ReturnSeries {
        compute_returns(prices, positions, 0.0, 0.0, 10_000.0)
    }

    #[test]
    fn flat_series_yields_zero_metrics() {
        let prices = vec![100.0, 101.0, 102.0, 103.0];
        let series = series_from(&prices, &[0, 0, 0, 0]);
        let metrics = Metrics::compute(&series, &[], 10_000.0);

        assert_eq!(metrics.total_return, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_eq!(metrics.sortino_ratio, 0.0);
        assert_eq!(metrics.max_drawdown, 0.0);
        assert_eq!(metrics.calmar_ratio, 0.0);
        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.total_trades, 0);
        assert_eq!(metrics.final_value, 10_000.0);
    }

    #[test]
    fn zero_variance_sharpe_is_zero_not_nan() {
        // Fully exposed on a constant price: every bar's return is exactly 0.
        let prices = vec![100.0, 100.0, 100.0, 100.0];
        let series = series_from(&prices, &[1, 1, 1, 1]);
        let metrics = Metrics::compute(&series, &[], 10_000.0);

        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert!(metrics.sharpe_ratio.is_finite());
    }

    #[test]
    fn total_return_matches_final_value() {
        let prices = vec![100.0, 110.0];
        let series = series_from(&prices, &[1, 1]);
        let metrics = Metrics::compute(&series, &[], 10_000.0);

        // Exposure lags: position taken at bar 0 earns bar 1's return.
        assert!((metrics.final_value - 11_000.0).abs() < 1e-6);
        assert!((metrics.total_return - 10.0).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_is_non_positive() {
        let prices = vec![100.0, 110.0, 88.0, 99.0];
        let series = series_from(&prices, &[1, 1, 1, 1]);
        let metrics = Metrics::compute(&series, &[], 10_000.0);

        assert!(metrics.max_drawdown < 0.0);
        // Peak 1.1, trough 0.88: drawdown = (0.88 - 1.1) / 1.1 = -20%.
        assert!((metrics.max_drawdown - (-20.0)).abs() < 1e-9);
    }

    #[test]
    fn calmar_relates_total_return_and_drawdown() {
        let prices = vec![100.0, 110.0, 88.0, 99.0];
        let series = series_from(&prices, &[1, 1, 1, 1]);
        let metrics = Metrics::compute(&series, &[], 10_000.0);

        let expected = metrics.total_return / metrics.max_drawdown.abs();
        assert!((metrics.calmar_ratio - expected).abs() < 1e-9);
    }

    #[test]
    fn win_rate_and_averages() {
        let trades = vec![
            make_trade(100.0),
            make_trade(-50.0),
            make_trade(200.0),
            make_trade(-30.0),
        ];
        let series = series_from(&[100.0, 101.0], &[0, 0]);
        let metrics = Metrics::compute(&series, &trades, 10_000.0);

        assert_eq!(metrics.total_trades, 4);
        assert_eq!(metrics.winning_trades, 2);
        assert_eq!(metrics.losing_trades, 2);
        assert!((metrics.win_rate - 50.0).abs() < 1e-9);
        assert!((metrics.avg_win - 150.0).abs() < 1e-9);
        assert!((metrics.avg_loss - (-40.0)).abs() < 1e-9);
        assert!((metrics.profit_factor - 3.75).abs() < 1e-9);
    }

    #[test]
    fn profit_factor_infinite_with_no_losses() {
        let trades = vec![make_trade(100.0), make_trade(50.0)];
        let series = series_from(&[100.0, 101.0], &[0, 0]);
        let metrics = Metrics::compute(&series, &trades, 10_000.0);

        assert!(metrics.profit_factor.is_infinite());
        assert!(metrics.profit_factor > 0.0);
    }

    #[test]
    fn profit_factor_zero_with_no_trades() {
        let series = series_from(&[100.0, 101.0], &[0, 0]);
        let metrics = Metrics::compute(&series, &[], 10_000.0);
        assert_eq!(metrics.profit_factor, 0.0);
    }

    #[test]
    fn sortino_zero_when_no_negative_bars() {
        let prices = vec![100.0, 101.0, 103.0, 104.0];
        let series = series_from(&prices, &[1, 1, 1, 1]);
        let metrics = Metrics::compute(&series, &[], 10_000.0);
        assert_eq!(metrics.sortino_ratio, 0.0);
    }

    #[test]
    fn sortino_finite_with_mixed_returns() {
        let prices = vec![100.0, 104.0, 99.0, 105.0, 101.0, 108.0];
        let series = series_from(&prices, &[1, 1, 1, 1, 1, 1]);
        let metrics = Metrics::compute(&series, &[], 10_000.0);
        assert!(metrics.sortino_ratio.is_finite());
        assert!(metrics.sortino_ratio != 0.0);
    }

    #[test]
    fn omega_infinite_with_no_losing_bars() {
        let prices = vec![100.0, 102.0, 105.0];
        let series = series_from(&prices, &[1, 1, 1]);
        let metrics = Metrics::compute(&series, &[], 10_000.0);
        assert!(metrics.omega_ratio.is_infinite());
    }

    #[test]
    fn skewness_zero_for_symmetric_returns() {
        let returns = vec![-0.02, -0.01, 0.0, 0.01, 0.02];
        let (skew, _) = standardized_moments(&returns);
        assert!(skew.abs() < 1e-12);
    }

    #[test]
    fn moments_zero_for_constant_returns() {
        let returns = vec![0.01, 0.01, 0.01];
        let (skew, kurt) = standardized_moments(&returns);
        assert_eq!(skew, 0.0);
        assert_eq!(kurt, 0.0);
    }

    #[test]
    fn compute_is_idempotent() {
        let prices = vec![100.0, 104.0, 99.0, 105.0, 101.0];
        let series = series_from(&prices, &[1, 1, -1, -1, 1]);
        let trades = vec![make_trade(25.0), make_trade(-10.0)];

        let a = Metrics::compute(&series, &trades, 10_000.0);
        let b = Metrics::compute(&series, &trades, 10_000.0);
        assert_eq!(a, b);
    }

    #[test]
    fn rounded_truncates_to_two_decimals() {
        let prices = vec![100.0, 103.333];
        let series = series_from(&prices, &[1, 1]);
        let metrics = Metrics::compute(&series, &[], 10_000.0).rounded();

        assert_eq!(metrics.total_return, 3.33);
        assert_eq!(metrics.final_value, 10_333.3);
    }

    #[test]
    fn rounded_preserves_infinite_sentinel() {
        let trades = vec![make_trade(10.0)];
        let series = series_from(&[100.0, 101.0], &[0, 0]);
        let metrics = Metrics::compute(&series, &trades, 10_000.0).rounded();
        assert!(metrics.profit_factor.is_infinite());
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(-2.344), -2.34);
        assert_eq!(round2(3.14159), 3.14);
        assert!(round2(f64::INFINITY).is_infinite());
    }
}
