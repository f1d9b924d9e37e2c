//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while building the shared portal types.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("unknown verification status: {0:?}")]
    UnknownStatus(String),

    #[error("unknown beneficiary status: {0:?}")]
    UnknownBeneficiaryStatus(String),
}
