//! Error types for dump tokenizing and melody encoding

/// Tokenizer error for a single dump line.
///
/// Fatal for the track the line belongs to, never for the whole dump
/// (except [`DumpError::InvalidHeader`], which precedes every track).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DumpError {
    #[error("line {line}: missing {field} field")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: invalid {field} `{value}`")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: {field} {value} is out of range (max {max})")]
    OutOfRange {
        line: usize,
        field: &'static str,
        value: i64,
        max: u8,
    },

    #[error("line {line}: negative time {value}")]
    NegativeTime { line: usize, value: i64 },

    #[error("line {line}: invalid MFile header")]
    InvalidHeader { line: usize },
}

/// Error type for encoding and configuration.
#[derive(Debug, thiserror::Error)]
pub enum MelodyError {
    #[error("Failed to render sketch: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Unknown encoder `{0}` (expected `table` or `compact`)")]
    UnknownEncoder(String),

    #[error("Rest of {gap} ticks needs {rests} rest tokens (max {max})")]
    RestTooLong { gap: i64, rests: i128, max: usize },
}
