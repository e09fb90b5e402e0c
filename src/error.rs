//! Error types.
//!
//! - `DomainError` is returned by the pure calculations (`math`, `percentile`,
//!   `reference`). It never carries I/O context.
//! - `AppError` is what the application layer returns. It carries the process
//!   exit code alongside a human-readable message.
//!
//! Exit codes: `2` input/IO/config, `3` domain, `4` internal/numerical.

/// Invalid parameters for a percentile computation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The reference standard deviation was zero, negative or not finite.
    NonPositiveSd(f64),
    /// An input that must be a finite number was NaN or infinite.
    NonFinite { what: &'static str, value: f64 },
    /// The reference table has no curve for the requested pair.
    MissingCurve { metric: String, sex: String },
    /// A reference table failed validation.
    InvalidTable(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NonPositiveSd(sd) => {
                write!(f, "Reference standard deviation must be > 0 (got {sd}).")
            }
            DomainError::NonFinite { what, value } => {
                write!(f, "Expected a finite {what} (got {value}).")
            }
            DomainError::MissingCurve { metric, sex } => {
                write!(f, "Reference table has no curve for metric={metric}, sex={sex}.")
            }
            DomainError::InvalidTable(reason) => write!(f, "Invalid reference table: {reason}"),
        }
    }
}

impl std::error::Error for DomainError {}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Shorthand for bad user input (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
