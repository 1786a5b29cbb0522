//! Core engine types and logic.

pub mod bar;
pub mod signal;
pub mod returns;
pub mod trade;
pub mod metrics;
pub mod ensemble;
pub mod backtest;
pub mod indicator;
pub mod strategy;
pub mod strategies;
pub mod error;
