//! RSI mean-reversion strategy.

use crate::domain::bar::{self, Bar};
use crate::domain::indicator;
use crate::domain::signal::Signal;
use crate::domain::strategy::{SignalStrategy, StrategyParams};

/// Buys while the RSI sits below the oversold level and sells while it sits
/// above the overbought level. Level-based rather than edge-based: every bar
/// past a threshold signals, and the position resolver handles repeats.
#[derive(Debug)]
pub struct RsiStrategy {
    period: usize,
    overbought: f64,
    oversold: f64,
}

impl RsiStrategy {
    pub fn from_params(params: &StrategyParams) -> Self {
        Self {
            period: params.get_usize("period", 14),
            overbought: params.get_f64("overbought", 70.0),
            oversold: params.get_f64("oversold", 30.0),
        }
    }
}

impl SignalStrategy for RsiStrategy {
    fn name(&self) -> &'static str {
        "rsi"
    }

    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = bar::closes(bars);
        indicator::rsi(&closes, self.period)
            .into_iter()
            .map(|rsi| match rsi {
                Some(value) if value < self.oversold => 1,
                Some(value) if value > self.overbought => -1,
                _ => 0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64);
                Bar::from_close(date, close)
            })
            .collect()
    }

    #[test]
    fn steady_rally_signals_sell() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&prices);
        let params = StrategyParams::new().with("period", "3");
        let strategy = RsiStrategy::from_params(&params);

        let signals = strategy.generate_signals(&bars);
        assert_eq!(&signals[..3], &[0, 0, 0]);
        assert!(signals[3..].iter().all(|&s| s == -1));
    }

    #[test]
    fn steady_decline_signals_buy() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        let bars = make_bars(&prices);
        let params = StrategyParams::new().with("period", "3");
        let strategy = RsiStrategy::from_params(&params);

        let signals = strategy.generate_signals(&bars);
        assert!(signals[3..].iter().all(|&s| s == 1));
    }

    #[test]
    fn flat_market_stays_quiet() {
        let bars = make_bars(&[100.0; 10]);
        let params = StrategyParams::new().with("period", "3");
        let strategy = RsiStrategy::from_params(&params);

        assert!(strategy.generate_signals(&bars).iter().all(|&s| s == 0));
    }

    #[test]
    fn custom_thresholds_are_honored() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&prices);
        // Overbought at 101 is unreachable, so nothing signals.
        let params = StrategyParams::new()
            .with("period", "3")
            .with("overbought", "101")
            .with("oversold", "-1");
        let strategy = RsiStrategy::from_params(&params);

        assert!(strategy.generate_signals(&bars).iter().all(|&s| s == 0));
    }
}
