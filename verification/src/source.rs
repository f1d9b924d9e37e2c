//! Candidate sources of verification status.

use brgy_types::{DocumentRef, VerificationStatus};

/// Where a report came from, ordered from stalest to freshest so that
/// `Ord` ranks the freshest source highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// Profile embedded in the authenticated user's session.
    SessionProfile,
    /// Profile object the host already had in memory.
    CachedProfile,
    /// Form state the host passed in explicitly.
    FormProp,
    /// Profile or status fetched from the server by this client.
    LiveFetch,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionProfile => "session_profile",
            Self::CachedProfile => "cached_profile",
            Self::FormProp => "form_prop",
            Self::LiveFetch => "live_fetch",
        }
    }
}

/// A possibly partial view of the verification record from one source.
///
/// `None` fields mean "this source said nothing about it", not "cleared".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceReport {
    pub kind: SourceKind,
    pub status: Option<VerificationStatus>,
    pub document_ref: Option<DocumentRef>,
    pub denial_reason: Option<String>,
    pub receipt_validated: Option<bool>,
}

impl SourceReport {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            status: None,
            document_ref: None,
            denial_reason: None,
            receipt_validated: None,
        }
    }

    pub fn with_status(mut self, status: VerificationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_document(mut self, document_ref: DocumentRef) -> Self {
        self.document_ref = Some(document_ref);
        self
    }

    pub fn with_denial_reason(mut self, reason: impl Into<String>) -> Self {
        self.denial_reason = Some(reason.into());
        self
    }

    pub fn with_receipt_validated(mut self, validated: bool) -> Self {
        self.receipt_validated = Some(validated);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.document_ref.is_none()
            && self.denial_reason.is_none()
            && self.receipt_validated.is_none()
    }

    /// Fold a newer report from the same source over this one, field by field.
    ///
    /// A status change invalidates the denial reason the old status carried.
    pub fn overlay(&mut self, newer: SourceReport) {
        if newer.status.is_some() && newer.status != self.status {
            self.denial_reason = None;
        }
        if newer.status.is_some() {
            self.status = newer.status;
        }
        if newer.document_ref.is_some() {
            self.document_ref = newer.document_ref;
        }
        if newer.denial_reason.is_some() {
            self.denial_reason = newer.denial_reason;
        }
        if newer.receipt_validated.is_some() {
            self.receipt_validated = newer.receipt_validated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_fetch_is_freshest() {
        assert!(SourceKind::LiveFetch > SourceKind::FormProp);
        assert!(SourceKind::FormProp > SourceKind::CachedProfile);
        assert!(SourceKind::CachedProfile > SourceKind::SessionProfile);
    }

    #[test]
    fn overlay_keeps_fields_the_newer_report_omits() {
        let mut slot = SourceReport::new(SourceKind::LiveFetch)
            .with_status(VerificationStatus::Pending)
            .with_document(DocumentRef::remote("docs/a.png"));
        slot.overlay(SourceReport::new(SourceKind::LiveFetch).with_status(VerificationStatus::Pending));
        assert_eq!(slot.document_ref, Some(DocumentRef::remote("docs/a.png")));
    }

    #[test]
    fn overlay_clears_reason_on_status_change() {
        let mut slot = SourceReport::new(SourceKind::LiveFetch)
            .with_status(VerificationStatus::Denied)
            .with_denial_reason("blurry image");
        slot.overlay(SourceReport::new(SourceKind::LiveFetch).with_status(VerificationStatus::Pending));
        assert_eq!(slot.denial_reason, None);
        assert_eq!(slot.status, Some(VerificationStatus::Pending));
    }

    #[test]
    fn empty_report() {
        assert!(SourceReport::new(SourceKind::FormProp).is_empty());
        assert!(!SourceReport::new(SourceKind::FormProp)
            .with_receipt_validated(false)
            .is_empty());
    }
}
