//! Data access port trait.

use crate::domain::bar::Bar;
use crate::domain::error::QuantbtError;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for one ticker inside the date range, sorted and validated
    /// (positive closes, strictly increasing dates).
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, QuantbtError>;

    fn list_tickers(&self) -> Result<Vec<String>, QuantbtError>;

    /// First date, last date and bar count for a ticker, `None` when the
    /// ticker has no rows.
    fn data_range(&self, ticker: &str)
        -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantbtError>;
}
