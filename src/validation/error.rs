use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an address (or a batch of addresses) is rejected.
///
/// `MalformedAddress`, `LengthExceeded` and `InvalidDomainEncoding` describe a
/// single address and end up inside a [`ValidationResult`]. `BatchTooLarge` is
/// a precondition failure of the bulk call and is reported before any address
/// is looked at.
///
/// [`ValidationResult`]: crate::validation::ValidationResult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[error("email address is malformed")]
    MalformedAddress,
    #[error("email address exceeds a length limit")]
    LengthExceeded,
    #[error("domain cannot be represented in ASCII-compatible encoding")]
    InvalidDomainEncoding,
    #[error("too many email addresses in one batch")]
    BatchTooLarge,
}

impl ErrorKind {
    /// Stable machine-readable code, identical to the serde representation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedAddress => "MALFORMED_ADDRESS",
            Self::LengthExceeded => "LENGTH_EXCEEDED",
            Self::InvalidDomainEncoding => "INVALID_DOMAIN_ENCODING",
            Self::BatchTooLarge => "BATCH_TOO_LARGE",
        }
    }
}
