use thiserror::Error;

/// Validation errors raised while turning client input into records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A required field was missing or empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A field was present but its value is out of range or malformed.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        /// Name of the offending field as it appears on the wire.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}
