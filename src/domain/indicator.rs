//! Rolling indicators over a close-price series.
//!
//! Windowed indicators return `None` for bars inside the warmup window so
//! callers can keep their output aligned with the bar axis. Exponential
//! averages are weighted from the first bar and have no warmup.

/// Simple moving average. `None` until a full window is available.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut window_sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(window_sum / period as f64);
    for i in period..values.len() {
        window_sum += values[i] - values[i - period];
        out[i] = Some(window_sum / period as f64);
    }
    out
}

/// Exponentially weighted mean with smoothing 2 / (span + 1), weighted over
/// the full history so every bar gets a value.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut out = Vec::with_capacity(values.len());
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for &value in values {
        numerator = value + decay * numerator;
        denominator = 1.0 + decay * denominator;
        out.push(numerator / denominator);
    }
    out
}

/// Rolling sample standard deviation (n - 1 denominator). Needs a window of
/// at least two observations.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period < 2 || values.len() < period {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (period as f64 - 1.0);
        out[i] = Some(variance.sqrt());
    }
    out
}

/// Relative strength index from rolling average gains and losses.
///
/// The first value lands at index `period` (the change series starts one bar
/// late). A window of pure gains reads 100; a window with no movement at all
/// has no defined strength and stays `None`.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let mut gains = vec![0.0; values.len()];
    let mut losses = vec![0.0; values.len()];
    for i in 1..values.len() {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    for i in period..values.len() {
        let window = i + 1 - period..=i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;

        out[i] = if avg_loss == 0.0 {
            (avg_gain > 0.0).then_some(100.0)
        } else {
            Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
        };
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD line (fast EMA minus slow EMA), its signal EMA, and the histogram.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal_span: usize) -> Vec<MacdPoint> {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&line, signal_span);

    line.iter()
        .zip(&signal)
        .map(|(&macd, &signal)| MacdPoint {
            macd,
            signal,
            histogram: macd - signal,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Bollinger bands: rolling mean with bands `num_std` sample deviations out.
pub fn bollinger(values: &[f64], period: usize, num_std: f64) -> Vec<Option<BollingerPoint>> {
    let middle = sma(values, period);
    let std = rolling_std(values, period);

    middle
        .into_iter()
        .zip(std)
        .map(|(middle, std)| {
            let (middle, std) = (middle?, std?);
            Some(BollingerPoint {
                middle,
                upper: middle + std * num_std,
                lower: middle - std * num_std,
            })
        })
        .collect()
}
