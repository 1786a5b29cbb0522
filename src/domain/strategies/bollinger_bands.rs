//! Bollinger band mean-reversion strategy.

use crate::domain::bar::{self, Bar};
use crate::domain::indicator;
use crate::domain::signal::Signal;
use crate::domain::strategy::{SignalStrategy, StrategyParams};

/// Buys when the close touches the lower band and sells when it touches the
/// upper band. When the bands collapse onto the middle (zero deviation in
/// the window) the upper-band test wins.
#[derive(Debug)]
pub struct BollingerBandsStrategy {
    period: usize,
    std_dev: f64,
}

impl BollingerBandsStrategy {
    pub fn from_params(params: &StrategyParams) -> Self {
        Self {
            period: params.get_usize("period", 20),
            std_dev: params.get_f64("std_dev", 2.0),
        }
    }
}

impl SignalStrategy for BollingerBandsStrategy {
    fn name(&self) -> &'static str {
        "bollinger_bands"
    }

    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = bar::closes(bars);
        indicator::bollinger(&closes, self.period, self.std_dev)
            .into_iter()
            .zip(&closes)
            .map(|(point, close)| match point {
                Some(p) if *close >= p.upper => -1,
                Some(p) if *close <= p.lower => 1,
                _ => 0,
            })
            .collect()
    }
}
