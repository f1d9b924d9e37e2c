//! The reconciled verification record.

use brgy_types::{DocumentRef, VerificationStatus};
use serde::{Deserialize, Serialize};

/// The client's view of one resident's residency check.
///
/// The server owns the real record; this is the cached, eventually-consistent
/// copy produced by [`crate::reconcile`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub status: VerificationStatus,
    /// The uploaded proof-of-address document, if any. Always `None` when denied.
    pub document_ref: Option<DocumentRef>,
    /// Administrator's explanation. Only present when denied.
    pub denial_reason: Option<String>,
    /// Set once the resident confirmed a payout with a valid receipt code.
    pub receipt_validated: bool,
}

impl VerificationRecord {
    pub fn has_document(&self) -> bool {
        self.document_ref.is_some()
    }

    pub fn is_approved(&self) -> bool {
        self.status == VerificationStatus::Approved
    }

    /// Enforce the field invariants: denied drops the document,
    /// anything but denied drops the denial reason.
    pub(crate) fn normalized(mut self) -> Self {
        if self.status == VerificationStatus::Denied {
            self.document_ref = None;
        } else {
            self.denial_reason = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_none_without_document() {
        let record = VerificationRecord::default();
        assert_eq!(record.status, VerificationStatus::None);
        assert!(!record.has_document());
        assert!(!record.receipt_validated);
    }

    #[test]
    fn normalizing_denied_drops_document() {
        let record = VerificationRecord {
            status: VerificationStatus::Denied,
            document_ref: Some(DocumentRef::remote("docs/a.png")),
            denial_reason: Some("blurry image".into()),
            receipt_validated: false,
        }
        .normalized();
        assert_eq!(record.document_ref, None);
        assert_eq!(record.denial_reason.as_deref(), Some("blurry image"));
    }

    #[test]
    fn normalizing_pending_drops_stale_reason() {
        let record = VerificationRecord {
            status: VerificationStatus::Pending,
            document_ref: Some(DocumentRef::remote("docs/b.png")),
            denial_reason: Some("old".into()),
            receipt_validated: false,
        }
        .normalized();
        assert_eq!(record.denial_reason, None);
        assert!(record.has_document());
    }
}
