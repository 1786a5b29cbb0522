//! Engine error types.
//!
//! Degenerate metric inputs (zero variance, zero trades, zero losses) are
//! not errors: each has a sentinel value defined in [`super::metrics`].

/// Top-level error type for quantbt.
#[derive(Debug, thiserror::Error)]
pub enum QuantbtError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy '{name}'")]
    UnknownStrategy { name: String },

    #[error("signal series length {signals} does not match price series length {bars}")]
    LengthMismatch { signals: usize, bars: usize },

    #[error("ensemble inputs disagree on series length or date axis")]
    DateAxisMismatch,

    #[error("initial capital must be positive, got {value}")]
    InvalidCapital { value: f64 },

    #[error("no strategy produced a usable result")]
    NoValidResults,

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantbtError> for std::process::ExitCode {
    fn from(err: &QuantbtError) -> Self {
        let code: u8 = match err {
            QuantbtError::Io(_) => 1,
            QuantbtError::ConfigParse { .. }
            | QuantbtError::ConfigMissing { .. }
            | QuantbtError::ConfigInvalid { .. } => 2,
            QuantbtError::Data { .. } => 3,
            QuantbtError::UnknownStrategy { .. }
            | QuantbtError::LengthMismatch { .. }
            | QuantbtError::DateAxisMismatch
            | QuantbtError::InvalidCapital { .. }
            | QuantbtError::NoValidResults => 4,
        };
        std::process::ExitCode::from(code)
    }
}
