//! CSV file data adapter.
//!
//! One file per ticker under a base directory, named `<TICKER>.csv` with a
//! `date,open,high,low,close,volume` header. The adapter owns input
//! validation: the engine assumes positive closes and a strictly increasing
//! date axis and never re-checks them.

use crate::domain::bar::Bar;
use crate::domain::error::QuantbtError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_all(&self, ticker: &str) -> Result<Vec<Bar>, QuantbtError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| QuantbtError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuantbtError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let field = |idx: usize, name: &str| {
                record.get(idx).ok_or_else(|| QuantbtError::Data {
                    reason: format!("missing {} column", name),
                })
            };

            let date = NaiveDate::parse_from_str(field(0, "date")?, "%Y-%m-%d").map_err(|e| {
                QuantbtError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let parse_f64 = |idx: usize, name: &str| -> Result<f64, QuantbtError> {
                field(idx, name)?.parse().map_err(|e| QuantbtError::Data {
                    reason: format!("invalid {} value: {}", name, e),
                })
            };

            let open = parse_f64(1, "open")?;
            let high = parse_f64(2, "high")?;
            let low = parse_f64(3, "low")?;
            let close = parse_f64(4, "close")?;
            let volume: i64 = field(5, "volume")?.parse().map_err(|e| QuantbtError::Data {
                reason: format!("invalid volume value: {}", e),
            })?;

            bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn validate(ticker: &str, bars: &[Bar]) -> Result<(), QuantbtError> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(QuantbtError::Data {
                    reason: format!("{}: duplicate date {}", ticker, pair[1].date),
                });
            }
        }
        if let Some(bad) = bars.iter().find(|b| !(b.close > 0.0)) {
            return Err(QuantbtError::Data {
                reason: format!(
                    "{}: non-positive close {} on {}",
                    ticker, bad.close, bad.date
                ),
            });
        }
        Ok(())
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, QuantbtError> {
        let mut bars = self.read_all(ticker)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Self::validate(ticker, &bars)?;
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, QuantbtError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| QuantbtError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| QuantbtError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantbtError> {
        let bars = self.read_all(ticker)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
