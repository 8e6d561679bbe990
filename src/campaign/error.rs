//! Error taxonomy for the retry operation.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Message surfaced when the remote gives no more specific reason.
pub const FALLBACK_MESSAGE: &str = "Retry operation failed";

/// Request fields checked by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CampaignIds,
    MaxAttempts,
    DelayMs,
}

impl Field {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::CampaignIds => "campaignIds",
            Field::MaxAttempts => "maxAttempts",
            Field::DelayMs => "delayMs",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    WrongType { expected: &'static str },
    /// Element at `index` is not a string.
    NonStringIdentifier { index: usize },
    /// Element at `index` is not a canonical UUID.
    MalformedIdentifier { index: usize },
    NotInteger,
    NotPositive,
    AboveMaximum { max: u64 },
    BelowMinimum { min: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: Field,
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn new(field: Field, kind: ViolationKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field;
        match &self.kind {
            ViolationKind::Missing => write!(f, "{} is required", field),
            ViolationKind::WrongType { expected } => {
                write!(f, "{} must be {}", field, expected)
            }
            ViolationKind::NonStringIdentifier { index } => {
                write!(f, "{} contains a non-string identifier at index {}", field, index)
            }
            ViolationKind::MalformedIdentifier { index } => {
                write!(f, "{} contains a malformed identifier at index {}", field, index)
            }
            ViolationKind::NotInteger => write!(f, "{} must be an integer", field),
            ViolationKind::NotPositive => write!(f, "{} must be positive", field),
            ViolationKind::AboveMaximum { max } => {
                write!(f, "{} exceeds maximum of {}", field, max)
            }
            ViolationKind::BelowMinimum { min } => {
                write!(f, "{} below minimum of {}", field, min)
            }
        }
    }
}

/// Every rule the input broke, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub(crate) fn new(violations: Vec<FieldViolation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// True if any violation concerns `field`.
    pub fn has_field(&self, field: Field) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Error, Debug)]
pub enum RetryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Credential unavailable: {0}")]
    Credential(String),

    #[error("{0}")]
    Transport(String),

    #[error("Request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{message}")]
    Application { message: String },
}

impl RetryError {
    /// Whether a caller may reasonably try the same request again later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout { .. } | Self::Server { .. }
        )
    }
}
