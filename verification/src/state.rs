//! The single authoritative copy of a resident's verification record.

use std::collections::BTreeMap;

use brgy_types::{DocumentRef, VerificationStatus};

use crate::error::VerificationError;
use crate::reconcile::reconcile;
use crate::record::VerificationRecord;
use crate::source::{SourceKind, SourceReport};
use crate::step::{classify, Step};

/// Result of applying one update to the [`ReconciliationState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub previous: VerificationRecord,
    pub record: VerificationRecord,
    /// True exactly once per state: the first time the record becomes approved.
    pub newly_approved: bool,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.previous != self.record
    }
}

/// Holds the latest report per source and the record reconciled from them.
///
/// All writers (initial load, poll ticks, upload and receipt results) go
/// through [`apply`](Self::apply), which is the one place the approved-is-sticky
/// rule is enforced. Out-of-order responses are therefore harmless: a late
/// `pending` cannot undo an `approved` that was already observed.
#[derive(Debug, Default)]
pub struct ReconciliationState {
    reports: BTreeMap<SourceKind, SourceReport>,
    record: VerificationRecord,
    approved_seen: bool,
    awaiting_first_status: bool,
    upload_generation: u64,
}

impl ReconciliationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the initial state from whatever sources the host has on hand.
    pub fn from_reports(reports: impl IntoIterator<Item = SourceReport>) -> (Self, Transition) {
        let mut state = Self::new();
        for report in reports {
            state.store_report(report);
        }
        let transition = state.recompute();
        (state, transition)
    }

    pub fn record(&self) -> &VerificationRecord {
        &self.record
    }

    pub fn step(&self) -> Step {
        classify(&self.record)
    }

    pub fn is_approved(&self) -> bool {
        self.approved_seen
    }

    /// True between a successful upload and the first status the server
    /// reports afterwards.
    pub fn awaiting_first_status(&self) -> bool {
        self.awaiting_first_status
    }

    /// Bumped by every recorded upload. Capture it before sending a live
    /// fetch and hand it back through [`apply_observed`](Self::apply_observed).
    pub fn upload_generation(&self) -> u64 {
        self.upload_generation
    }

    /// Fold a report from any source into the state.
    pub fn apply(&mut self, report: SourceReport) -> Transition {
        let generation = self.upload_generation;
        self.apply_observed(report, generation)
    }

    /// Fold in a report whose request was sent at upload generation
    /// `generation`.
    ///
    /// A report sent before a later upload only counts if it carries an
    /// approval; everything else it says was superseded by the upload.
    pub fn apply_observed(&mut self, report: SourceReport, generation: u64) -> Transition {
        if generation != self.upload_generation {
            if report.status != Some(VerificationStatus::Approved) {
                return self.unchanged();
            }
            self.store_report(
                SourceReport::new(report.kind).with_status(VerificationStatus::Approved),
            );
            return self.recompute();
        }
        if report.kind == SourceKind::LiveFetch && report.status.is_some() {
            self.awaiting_first_status = false;
        }
        self.store_report(report);
        self.recompute()
    }

    /// Record a successful upload: the resident is now pending review.
    pub fn record_upload(
        &mut self,
        document_ref: DocumentRef,
    ) -> Result<Transition, VerificationError> {
        if self.approved_seen {
            return Err(VerificationError::AlreadyApproved);
        }
        self.store_report(
            SourceReport::new(SourceKind::LiveFetch)
                .with_status(VerificationStatus::Pending)
                .with_document(document_ref),
        );
        self.awaiting_first_status = true;
        self.upload_generation = self.upload_generation.wrapping_add(1);
        Ok(self.recompute())
    }

    /// Record a successful receipt validation.
    pub fn mark_receipt_validated(&mut self) -> Transition {
        self.store_report(SourceReport::new(SourceKind::LiveFetch).with_receipt_validated(true));
        self.recompute()
    }

    fn unchanged(&self) -> Transition {
        Transition {
            previous: self.record.clone(),
            record: self.record.clone(),
            newly_approved: false,
        }
    }

    fn store_report(&mut self, report: SourceReport) {
        match self.reports.get_mut(&report.kind) {
            Some(slot) => slot.overlay(report),
            None => {
                self.reports.insert(report.kind, report);
            }
        }
    }

    fn recompute(&mut self) -> Transition {
        let mut next = reconcile(self.reports.values());

        if self.approved_seen && !next.is_approved() {
            // A stale or partial source disagrees; keep the approval.
            next = VerificationRecord {
                status: VerificationStatus::Approved,
                document_ref: next
                    .document_ref
                    .or_else(|| self.record.document_ref.clone()),
                denial_reason: None,
                receipt_validated: next.receipt_validated || self.record.receipt_validated,
            };
        }

        let newly_approved = next.is_approved() && !self.approved_seen;
        if newly_approved {
            self.approved_seen = true;
            self.awaiting_first_status = false;
        }

        let previous = std::mem::replace(&mut self.record, next.clone());
        Transition {
            previous,
            record: next,
            newly_approved,
        }
    }
}
