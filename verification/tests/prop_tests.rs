use proptest::prelude::*;

use brgy_types::{DocumentRef, VerificationStatus};
use brgy_verification::{classify, reconcile, ReconciliationState, SourceKind, SourceReport, Step};

fn status() -> impl Strategy<Value = VerificationStatus> {
    prop_oneof![
        Just(VerificationStatus::None),
        Just(VerificationStatus::Pending),
        Just(VerificationStatus::Approved),
        Just(VerificationStatus::Denied),
    ]
}

fn kind() -> impl Strategy<Value = SourceKind> {
    prop_oneof![
        Just(SourceKind::SessionProfile),
        Just(SourceKind::CachedProfile),
        Just(SourceKind::FormProp),
        Just(SourceKind::LiveFetch),
    ]
}

prop_compose! {
    fn report()(
        kind in kind(),
        status in proptest::option::of(status()),
        doc in proptest::option::of("[a-z]{1,8}\\.png"),
        reason in proptest::option::of("[a-z ]{1,16}"),
    ) -> SourceReport {
        SourceReport {
            kind,
            status,
            document_ref: doc.map(|d| DocumentRef::remote(format!("docs/{d}"))),
            denial_reason: reason,
            receipt_validated: None,
        }
    }
}

proptest! {
    /// Once any report says approved, every later step is ProfileUnlocked.
    #[test]
    fn approval_is_sticky(reports in prop::collection::vec(report(), 1..24)) {
        let mut state = ReconciliationState::new();
        let mut seen_approval = false;
        let mut announcements = 0;
        for r in reports {
            seen_approval |= r.status == Some(VerificationStatus::Approved);
            let t = state.apply(r);
            if t.newly_approved {
                announcements += 1;
            }
            if seen_approval {
                prop_assert_eq!(state.step(), Step::ProfileUnlocked);
            }
        }
        prop_assert_eq!(announcements, usize::from(seen_approval));
    }

    /// A denied record never carries a document, whatever the sources say.
    #[test]
    fn denied_never_has_document(reports in prop::collection::vec(report(), 0..8)) {
        let record = reconcile(&reports);
        if record.status == VerificationStatus::Denied {
            prop_assert!(record.document_ref.is_none());
        } else {
            prop_assert!(record.denial_reason.is_none());
        }
    }

    /// classify is a pure function of the record.
    #[test]
    fn classify_is_deterministic(reports in prop::collection::vec(report(), 0..8)) {
        let record = reconcile(&reports);
        prop_assert_eq!(classify(&record), classify(&record.clone()));
    }

    /// Source order in the input slice does not matter across distinct kinds.
    #[test]
    fn reconcile_ignores_input_order(mut reports in prop::collection::vec(report(), 0..8)) {
        reports.sort_by_key(|r| r.kind);
        reports.dedup_by_key(|r| r.kind);
        let forward = reconcile(&reports);
        reports.reverse();
        prop_assert_eq!(forward, reconcile(&reports));
    }
}
