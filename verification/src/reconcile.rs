//! Precedence-ordered merge of source reports into one record.
//!
//! Rules, applied to the reports sorted freshest first:
//! 1. Status: `approved` from any source wins outright; otherwise the freshest
//!    source that reports a status; otherwise `none`.
//! 2. Document: taken from the approving source if it has one, else from the
//!    freshest non-denied source that carries one. Dropped when denied.
//! 3. Denial reason: the freshest reason from a source reporting `denied`.
//! 4. Receipt validation: set if any source reports it.

use std::cmp::Reverse;

use brgy_types::VerificationStatus;

use crate::record::VerificationRecord;
use crate::source::SourceReport;

pub fn reconcile<'a, I>(sources: I) -> VerificationRecord
where
    I: IntoIterator<Item = &'a SourceReport>,
{
    let mut ordered: Vec<&SourceReport> = sources.into_iter().collect();
    // Stable: equal kinds keep caller order.
    ordered.sort_by_key(|s| Reverse(s.kind));

    let approving = ordered
        .iter()
        .find(|s| s.status == Some(VerificationStatus::Approved));

    let status = approving
        .and_then(|s| s.status)
        .or_else(|| ordered.iter().find_map(|s| s.status))
        .unwrap_or_default();

    let document_ref = approving
        .and_then(|s| s.document_ref.clone())
        .or_else(|| {
            ordered
                .iter()
                .filter(|s| s.status != Some(VerificationStatus::Denied))
                .find_map(|s| s.document_ref.clone())
        });

    let denial_reason = ordered
        .iter()
        .filter(|s| s.status == Some(VerificationStatus::Denied))
        .find_map(|s| s.denial_reason.clone());

    let receipt_validated = ordered.iter().any(|s| s.receipt_validated == Some(true));

    VerificationRecord {
        status,
        document_ref,
        denial_reason,
        receipt_validated,
    }
    .normalized()
}
