//! Maps a reconciled record to the UI phase the resident should see.

use brgy_types::VerificationStatus;

use crate::record::VerificationRecord;

/// Coarse UI phase of the verification flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Step 1: upload a proof-of-address document. Carries the administrator's
    /// reason when a previous document was denied.
    Upload { denial_reason: Option<String> },
    /// Step 2: a document is waiting for review.
    UnderReview,
    /// Step 3: residency approved, profile editing unlocked.
    ProfileUnlocked,
}

impl Step {
    pub fn number(&self) -> u8 {
        match self {
            Self::Upload { .. } => 1,
            Self::UnderReview => 2,
            Self::ProfileUnlocked => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "upload",
            Self::UnderReview => "under_review",
            Self::ProfileUnlocked => "profile_unlocked",
        }
    }
}

/// Strict precedence: denied, then approved, then pending with a document,
/// then everything else.
pub fn classify(record: &VerificationRecord) -> Step {
    match record.status {
        VerificationStatus::Denied => Step::Upload {
            denial_reason: record.denial_reason.clone(),
        },
        VerificationStatus::Approved => Step::ProfileUnlocked,
        VerificationStatus::Pending if record.has_document() => Step::UnderReview,
        _ => Step::Upload {
            denial_reason: None,
        },
    }
}
