//! Turning backend profile bodies into reconciliation inputs.

use brgy_client::{ProfileResponse, StatusResponse};
use brgy_verification::{SourceKind, SourceReport};

/// Report carrying everything a full profile says about verification.
///
/// Used both for live `GET /profile` results and for profiles the host
/// already holds (cached, session-embedded, form state), tagged with `kind`.
pub fn profile_report(kind: SourceKind, profile: &ProfileResponse) -> SourceReport {
    SourceReport {
        kind,
        status: profile.status(),
        document_ref: profile.document_ref(),
        denial_reason: profile.denial_reason().map(str::to_string),
        receipt_validated: None,
    }
}

/// Report from a `GET /profile/status` poll; always a live fetch.
pub fn status_report(status: &StatusResponse) -> SourceReport {
    SourceReport {
        kind: SourceKind::LiveFetch,
        status: status.status(),
        document_ref: None,
        denial_reason: None,
        receipt_validated: None,
    }
}
