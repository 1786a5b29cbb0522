//! MACD signal-line crossover strategy.

use crate::domain::bar::{self, Bar};
use crate::domain::indicator;
use crate::domain::signal::Signal;
use crate::domain::strategy::{SignalStrategy, StrategyParams};

/// Buys when the MACD line crosses above its signal line, sells when it
/// crosses below. Edge-based: only the crossing bar signals.
#[derive(Debug)]
pub struct MacdStrategy {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl MacdStrategy {
    pub fn from_params(params: &StrategyParams) -> Self {
        Self {
            fast_period: params.get_usize("fast_period", 12),
            slow_period: params.get_usize("slow_period", 26),
            signal_period: params.get_usize("signal_period", 9),
        }
    }
}

impl SignalStrategy for MacdStrategy {
    fn name(&self) -> &'static str {
        "macd"
    }

    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = bar::closes(bars);
        let points = indicator::macd(
            &closes,
            self.fast_period,
            self.slow_period,
            self.signal_period,
        );

        points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 {
                    return 0;
                }
                let prev = &points[i - 1];
                if p.macd > p.signal && prev.macd <= prev.signal {
                    1
                } else if p.macd < p.signal && prev.macd >= prev.signal {
                    -1
                } else {
                    0
                }
            })
            .collect()
    }
}
