//! Signal and position series.
//!
//! A signal is a per-bar instruction in {-1, 0, +1} (sell/hold/buy), where 0
//! means "no new instruction at this bar". The held position is derived by
//! forward-filling the last non-zero signal.

/// Per-bar instruction emitted by a strategy: -1 sell, 0 hold, +1 buy.
pub type Signal = i8;

pub const SELL: Signal = -1;
pub const HOLD: Signal = 0;
pub const BUY: Signal = 1;

/// Resolve a sparse signal series into the dense held-position series.
///
/// `position[i] = signal[i]` when `signal[i] != 0`, otherwise the previous
/// position carries forward, with an implicit flat seed before the first bar.
/// Single pass into a fresh buffer; the input is never aliased or mutated.
pub fn resolve_positions(signals: &[Signal]) -> Vec<Signal> {
    let mut positions = Vec::with_capacity(signals.len());
    let mut held: Signal = 0;

    for &signal in signals {
        if signal != 0 {
            held = signal;
        }
        positions.push(held);
    }

    positions
}
