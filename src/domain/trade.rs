//! Trade reconstruction from the held-position series.
//!
//! A single pass over the position stream pairs each entry with its exit.
//! A position still open at the end of the series is left unrealized and
//! produces no trade record; there is no forced liquidation.

use chrono::NaiveDate;
use serde::Serialize;

use super::metrics::round2;
use super::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Long,
    Short,
}

/// One closed round-trip. Prices, pnl and return_pct are rounded to two
/// decimals at this boundary; the return series itself stays full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub side: TradeSide,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: i64,
    pub pnl: f64,
    pub return_pct: f64,
}

struct OpenPosition {
    position: Signal,
    entry_price: f64,
    entry_date: NaiveDate,
}

/// Scan the position series and emit a trade whenever a non-zero position
/// closes. A reversal (long to short in one bar) closes the old trade and
/// opens the new one at the same bar.
pub fn extract_trades(dates: &[NaiveDate], prices: &[f64], positions: &[Signal]) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut open: Option<OpenPosition> = None;

    for i in 0..positions.len() {
        let held = open.as_ref().map(|o| o.position).unwrap_or(0);
        if positions[i] == held {
            continue;
        }

        if let Some(state) = open.take() {
            trades.push(close_trade(&state, prices[i], dates[i]));
        }

        if positions[i] != 0 {
            open = Some(OpenPosition {
                position: positions[i],
                entry_price: prices[i],
                entry_date: dates[i],
            });
        }
    }

    trades
}

fn close_trade(state: &OpenPosition, exit_price: f64, exit_date: NaiveDate) -> Trade {
    let signed_position = state.position as f64;
    let quantity = (state.position as i64).abs();
    let pnl = (exit_price - state.entry_price) * signed_position;
    let return_pct = pnl / (state.entry_price * quantity as f64) * 100.0;

    Trade {
        entry_date: state.entry_date,
        exit_date,
        side: if state.position > 0 {
            TradeSide::Long
        } else {
            TradeSide::Short
        },
        entry_price: round2(state.entry_price),
        exit_price: round2(exit_price),
        quantity,
        pnl: round2(pnl),
        return_pct: round2(return_pct),
    }
}
