//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for fundsim.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FundsimError {
    #[error("no price observations supplied")]
    EmptyInput,

    #[error("no price observations between {start} and {end}")]
    NoDataInRange { start: NaiveDate, end: NaiveDate },

    #[error("insufficient history: have {have} trading days, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("invariant violation on {date}: {reason}")]
    InvariantViolation { date: NaiveDate, reason: String },

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

    #[error("quote feed error: {reason}")]
    Quote { reason: String },

    #[error("io error: {reason}")]
    Io { reason: String },
}

impl FundsimError {
    /// Shorthand for an [`FundsimError::InvalidParameter`].
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        FundsimError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for FundsimError {
    fn from(err: std::io::Error) -> Self {
        FundsimError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<&FundsimError> for std::process::ExitCode {
    fn from(err: &FundsimError) -> Self {
        let code: u8 = match err {
            FundsimError::Io { .. } => 1,
            FundsimError::ConfigParse { .. }
            | FundsimError::ConfigMissing { .. }
            | FundsimError::ConfigInvalid { .. } => 2,
            FundsimError::Quote { .. } => 3,
            FundsimError::InvalidParameter { .. } => 4,
            FundsimError::EmptyInput
            | FundsimError::NoDataInRange { .. }
            | FundsimError::InsufficientHistory { .. } => 5,
            FundsimError::InvariantViolation { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
