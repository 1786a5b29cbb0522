//! Daily price bar representation.

use chrono::NaiveDate;

/// One timestamped price observation. Immutable once produced by the
/// data adapter; the engine never mutates bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// Bar with all prices set to `close`, used by strategies that only
    /// consume the close and by tests.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Bar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }
}

/// Collect the close column from a bar slice.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Collect the date column from a bar slice.
pub fn dates(bars: &[Bar]) -> Vec<NaiveDate> {
    bars.iter().map(|b| b.date).collect()
}
