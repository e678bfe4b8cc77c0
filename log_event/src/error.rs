use std::fmt::{Display, Formatter};

/// Raised while turning an inbound event into a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    InvalidPayloadJson { reason: String },
}

impl std::error::Error for NormalizationError {}

impl Display for NormalizationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationError::InvalidPayloadJson { reason } => {
                write!(f, "Failed to parse data JSON: {}", reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEventError {
    InvalidPayloadJson { reason: String },
    StorageWriteFailed { table: String, reason: String },
}

impl std::error::Error for LogEventError {}

impl Display for LogEventError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogEventError::InvalidPayloadJson { reason } => {
                write!(f, "Failed to parse data JSON: {}", reason)
            }
            LogEventError::StorageWriteFailed { table, reason } => {
                write!(f, "ERROR: Dynamo failed writing to {}: {}", table, reason)
            }
        }
    }
}

impl From<NormalizationError> for LogEventError {
    fn from(e: NormalizationError) -> Self {
        match e {
            NormalizationError::InvalidPayloadJson { reason } => {
                LogEventError::InvalidPayloadJson { reason }
            }
        }
    }
}
