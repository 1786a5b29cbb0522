#![allow(dead_code)]

use chrono::NaiveDate;
pub use quantbt::domain::bar::Bar;
use quantbt::domain::backtest::BacktestConfig;
use quantbt::domain::error::QuantbtError;
use quantbt::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, QuantbtError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(QuantbtError::Data {
                reason: reason.clone(),
            });
        }
        let mut bars = self.data.get(ticker).cloned().unwrap_or_default();
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, QuantbtError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantbtError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(QuantbtError::Data {
                reason: reason.clone(),
            });
        }
        Ok(match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Some((min, max, bars.len()))
            }
            _ => None,
        })
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> Bar {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap();
    Bar::from_close(date, close)
}

/// Bars on consecutive days from 2024-01-01.
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Bar::from_close(
                date(2024, 1, 1) + chrono::Duration::days(i as i64),
                close,
            )
        })
        .collect()
}

/// Zero-cost config over 2024 with 10k capital.
pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        ticker: "AAPL".into(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        initial_capital: 10_000.0,
        commission_rate: 0.0,
        slippage_rate: 0.0,
    }
}
