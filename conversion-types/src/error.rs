//! Error types for the conversion service.

use crate::ports::ClientError;

/// Service-level errors.
///
/// Validation and unknown-currency errors are correctable by the caller;
/// upstream errors come from the rate provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("Invalid request: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("output_currency_type {0} is not a valid currency type")]
    UnknownCurrency(String),

    #[error(transparent)]
    Upstream(#[from] ClientError),
}

impl ConversionError {
    /// Returns the human-readable messages reported to the caller.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ConversionError::Validation(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Whether the caller can fix the request and try again.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, ConversionError::Upstream(_))
    }
}
