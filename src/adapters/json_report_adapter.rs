//! JSON report adapter.
//!
//! Serializes one backtest result to a pretty-printed JSON document.
//! Non-finite metric values (the zero-loss profit factor sentinel) come out
//! as JSON null.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::QuantbtError;
use crate::ports::report_port::ReportPort;
use serde_json::json;
use std::fs;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_path: &str,
    ) -> Result<(), QuantbtError> {
        let equity_curve: Vec<_> = result
            .dates
            .iter()
            .zip(&result.portfolio_value)
            .map(|(date, value)| json!({ "date": date, "value": value }))
            .collect();

        let report = json!({
            "ticker": config.ticker,
            "strategy": result.strategy_name,
            "start_date": config.start_date,
            "end_date": config.end_date,
            "initial_capital": config.initial_capital,
            "commission_rate": config.commission_rate,
            "slippage_rate": config.slippage_rate,
            "metrics": result.metrics,
            "trades": result.trades,
            "equity_curve": equity_curve,
            "signals": result.signals,
        });

        let body = serde_json::to_string_pretty(&report).map_err(|e| QuantbtError::Data {
            reason: format!("report serialization failed: {}", e),
        })?;
        fs::write(output_path, body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::run_strategy;
    use crate::domain::bar::Bar;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_result() -> (BacktestResult, BacktestConfig) {
        let bars: Vec<Bar> = [100.0, 102.0, 99.0, 105.0, 110.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64);
                Bar::from_close(date, close)
            })
            .collect();
        let config = BacktestConfig {
            ticker: "AAPL".into(),
            start_date: bars[0].date,
            end_date: bars[4].date,
            initial_capital: 10_000.0,
            commission_rate: 0.001,
            slippage_rate: 0.0005,
        };
        let result = run_strategy("manual", vec![1, 0, 0, -1, 0], &bars, &config).unwrap();
        (result, config)
    }

    #[test]
    fn writes_a_complete_document() {
        let (result, config) = sample_result();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        JsonReportAdapter
            .write(&result, &config, path.to_str().unwrap())
            .unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["ticker"], "AAPL");
        assert_eq!(doc["strategy"], "manual");
        assert_eq!(doc["start_date"], "2024-01-01");
        assert_eq!(doc["trades"].as_array().unwrap().len(), 1);
        assert_eq!(doc["equity_curve"].as_array().unwrap().len(), 5);
        assert_eq!(doc["trades"][0]["side"], "LONG");
        assert!(doc["metrics"]["sharpe_ratio"].is_number());
    }

    #[test]
    fn infinite_profit_factor_serializes_as_null() {
        let (mut result, config) = sample_result();
        result.metrics.profit_factor = f64::INFINITY;
        result.metrics.omega_ratio = f64::INFINITY;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        JsonReportAdapter
            .write(&result, &config, path.to_str().unwrap())
            .unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(doc["metrics"]["profit_factor"].is_null());
        assert!(doc["metrics"]["omega_ratio"].is_null());
    }
}
