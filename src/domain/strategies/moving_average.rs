//! Moving average crossover strategy.

use crate::domain::bar::{self, Bar};
use crate::domain::indicator;
use crate::domain::signal::Signal;
use crate::domain::strategy::{SignalStrategy, StrategyParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaType {
    Sma,
    Ema,
}

/// Buys when the close crosses above its moving average and sells when it
/// crosses below. Only the crossing bar signals; bars that stay on the same
/// side of the average are quiet.
#[derive(Debug)]
pub struct MovingAverageStrategy {
    period: usize,
    ma_type: MaType,
}

impl MovingAverageStrategy {
    pub fn from_params(params: &StrategyParams) -> Self {
        let ma_type = match params.get_str("type", "SMA").to_ascii_uppercase().as_str() {
            "EMA" => MaType::Ema,
            _ => MaType::Sma,
        };
        Self {
            period: params.get_usize("period", 20),
            ma_type,
        }
    }
}

impl SignalStrategy for MovingAverageStrategy {
    fn name(&self) -> &'static str {
        "moving_average"
    }

    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = bar::closes(bars);
        let ma: Vec<Option<f64>> = match self.ma_type {
            MaType::Sma => indicator::sma(&closes, self.period),
            MaType::Ema => indicator::ema(&closes, self.period)
                .into_iter()
                .map(Some)
                .collect(),
        };

        // Which side of the average each bar sits on; equal or warmup is 0.
        let side: Vec<Signal> = closes
            .iter()
            .zip(&ma)
            .map(|(close, ma)| match ma {
                Some(ma) if close > ma => 1,
                Some(ma) if close < ma => -1,
                _ => 0,
            })
            .collect();

        // Signal only when the side changes.
        side.iter()
            .enumerate()
            .map(|(i, &s)| {
                if i > 0 && s == side[i - 1] {
                    0
                } else {
                    s
                }
            })
            .collect()
    }
}
