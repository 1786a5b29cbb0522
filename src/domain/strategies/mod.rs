//! Built-in signal strategies.

mod bollinger_bands;
mod macd;
mod moving_average;
mod rsi;

pub use bollinger_bands::BollingerBandsStrategy;
pub use macd::MacdStrategy;
pub use moving_average::MovingAverageStrategy;
pub use rsi::RsiStrategy;
