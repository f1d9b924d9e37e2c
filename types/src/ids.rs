//! Identifier newtypes for residents and beneficiary enrollments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PortalError;

/// Identifies one resident account on the portal backend.
///
/// The backend hands these out; the client treats them as opaque.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResidentId(String);

impl ResidentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResidentId {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PortalError::InvalidId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Identifies a resident's enrollment in one social-assistance program.
///
/// Used as the `{id}` segment of `/my-benefits/{id}/...` paths, so it must
/// be a single non-empty path segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "wire::RawId")]
pub struct BeneficiaryId(String);

impl BeneficiaryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeneficiaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BeneficiaryId {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(PortalError::InvalidId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<u64> for BeneficiaryId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

mod wire {
    use serde::Deserialize;

    /// The backend sends numeric primary keys; older endpoints send strings.
    #[derive(Deserialize)]
    #[serde(untagged)]
    pub enum RawId {
        Number(u64),
        Text(String),
    }

    impl TryFrom<RawId> for super::BeneficiaryId {
        type Error = crate::PortalError;

        fn try_from(raw: RawId) -> Result<Self, Self::Error> {
            match raw {
                RawId::Number(n) => Ok(n.into()),
                RawId::Text(s) => s.parse(),
            }
        }
    }
}
