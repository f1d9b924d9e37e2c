//! State enums for residency verification and program enrollment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PortalError;

/// Where a resident stands in the residency-verification process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// No document has ever been submitted.
    #[default]
    None,
    /// A document is waiting for an administrator's decision.
    Pending,
    /// Residency confirmed. Terminal.
    Approved,
    /// The document was rejected; the resident must upload a new one.
    Denied,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = PortalError;

    /// Accepts the backend's spellings, including the legacy
    /// `verified` / `rejected` / `not_submitted` values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "not_submitted" | "unverified" => Ok(Self::None),
            "pending" | "submitted" | "under_review" => Ok(Self::Pending),
            "approved" | "verified" => Ok(Self::Approved),
            "denied" | "rejected" => Ok(Self::Denied),
            _ => Err(PortalError::UnknownStatus(s.to_string())),
        }
    }
}

/// Enrollment state of a beneficiary record in a social-services program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeneficiaryStatus {
    /// Application received, not yet reviewed.
    Pending,
    /// Accepted into the program; payout may follow.
    Approved,
    /// Application turned down.
    Rejected,
}

impl BeneficiaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for BeneficiaryStatus {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "applied" => Ok(Self::Pending),
            "approved" | "active" | "enrolled" => Ok(Self::Approved),
            "rejected" | "denied" => Ok(Self::Rejected),
            _ => Err(PortalError::UnknownBeneficiaryStatus(s.to_string())),
        }
    }
}
