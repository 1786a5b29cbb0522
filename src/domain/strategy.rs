//! Strategy abstraction and registry.
//!
//! A strategy turns a bar series into one sparse signal per bar and nothing
//! else; position handling, costs and accounting live in the engine.
//! Strategies are built by name through [`build_strategy`] so the CLI and
//! config layer never depend on concrete strategy types.

use super::bar::Bar;
use super::error::QuantbtError;
use super::signal::Signal;
use super::strategies::{
    BollingerBandsStrategy, MacdStrategy, MovingAverageStrategy, RsiStrategy,
};
use std::collections::BTreeMap;

/// Emits one signal per bar: 1 buy, -1 sell, 0 hold.
///
/// Implementations must be deterministic in the bar series alone and must
/// return exactly `bars.len()` signals.
pub trait SignalStrategy: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal>;
}

/// String-keyed strategy parameters as read from config. Typed getters fall
/// back to the caller's default when a key is absent or unparseable, the
/// same leniency the config format itself has.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyParams(BTreeMap<String, String>);

impl StrategyParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.0
            .get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.0
            .get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.0
            .get(key)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| default.to_string())
    }
}

/// Registry of strategy names accepted by [`build_strategy`].
pub fn available_strategies() -> &'static [&'static str] {
    &["moving_average", "rsi", "macd", "bollinger_bands"]
}

/// Build a strategy by registry name.
pub fn build_strategy(
    name: &str,
    params: &StrategyParams,
) -> Result<Box<dyn SignalStrategy>, QuantbtError> {
    match name {
        "moving_average" => Ok(Box::new(MovingAverageStrategy::from_params(params))),
        "rsi" => Ok(Box::new(RsiStrategy::from_params(params))),
        "macd" => Ok(Box::new(MacdStrategy::from_params(params))),
        "bollinger_bands" => Ok(Box::new(BollingerBandsStrategy::from_params(params))),
        _ => Err(QuantbtError::UnknownStrategy {
            name: name.to_string(),
        }),
    }
}
