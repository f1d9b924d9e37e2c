//! End-to-end flows through a session wired to the nullable backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use brgy_client::{
    BeneficiaryRecord, ClientError, PortalApi, ProfileResponse, ReceiptRequest, StatusResponse,
    UploadResponse,
};
use brgy_nullables::{profile_response, NullCall, NullFlagStore, NullPortalApi};
use brgy_portal::{PollerExit, PortalEvent, SessionError, StatusPoller, VerificationSession};
use brgy_resident::error::INVALID_RECEIPT_MESSAGE;
use brgy_resident::{ReceiptSubmission, ResidentError, TrackingStage};
use brgy_store::{FlagStore, JsonFileStore};
use brgy_types::{BeneficiaryId, DocumentRef, ResidentId, UploadFile, VerificationStatus};
use brgy_verification::{SourceKind, SourceReport, Step};
use tokio::sync::{broadcast, Notify};

fn session_with(api: &Arc<NullPortalApi>, flags: Arc<dyn FlagStore>) -> VerificationSession {
    VerificationSession::new(
        ResidentId::new("res-42"),
        Arc::clone(api) as Arc<dyn PortalApi>,
        flags,
    )
}

fn session(api: &Arc<NullPortalApi>) -> VerificationSession {
    session_with(api, Arc::new(NullFlagStore::new()))
}

fn png(len: usize) -> UploadFile {
    UploadFile::new("id-card.png", "image/png", vec![0x89; len])
}

fn drain(rx: &mut broadcast::Receiver<PortalEvent>) -> Vec<PortalEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

fn approvals(events: &[PortalEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, PortalEvent::Approved { .. }))
        .count()
}

fn beneficiary(id: u64, status: &str, receipt_validated: bool) -> BeneficiaryRecord {
    BeneficiaryRecord {
        id: BeneficiaryId::from(id),
        program_name: Some("Educational Assistance".into()),
        status: status.into(),
        receipt_validated,
        receipt_validated_at: None,
        comment: None,
    }
}

#[tokio::test]
async fn upload_moves_new_resident_to_review() {
    let api = Arc::new(NullPortalApi::new());
    api.set_profile(profile_response(Some("none"), None, None));
    api.set_upload_path("docs/a.png");
    let s = session(&api);

    s.load([]).await.unwrap();
    assert_eq!(s.step().await, Step::Upload { denial_reason: None });

    let mut events = s.subscribe();
    let record = s.upload(&png(1024)).await.unwrap();

    assert_eq!(record.status, VerificationStatus::Pending);
    assert_eq!(record.document_ref, Some(DocumentRef::remote("docs/a.png")));
    assert_eq!(s.step().await, Step::UnderReview);
    assert_eq!(s.next_poll_delay().await, Some(Duration::from_secs(2)));

    let events = drain(&mut events);
    assert_eq!(
        events,
        vec![PortalEvent::RecordChanged {
            record,
            step: Step::UnderReview
        }]
    );
}

#[tokio::test]
async fn approval_announced_once_and_sticks() {
    let api = Arc::new(NullPortalApi::new());
    api.set_profile(profile_response(Some("pending"), Some("docs/a.png"), None));
    let s = session(&api);
    s.load([]).await.unwrap();
    assert_eq!(s.step().await, Step::UnderReview);

    let mut events = s.subscribe();
    api.push_status(Ok(StatusResponse {
        verification_status: Some("approved".into()),
    }));
    api.set_profile(profile_response(Some("approved"), Some("docs/a.png"), None));
    s.poll_once().await.unwrap();

    // Stale responses after the approval.
    api.push_status(Ok(StatusResponse {
        verification_status: Some("pending".into()),
    }));
    api.set_status("approved");
    s.poll_once().await.unwrap();
    s.poll_once().await.unwrap();
    s.apply_source(
        SourceReport::new(SourceKind::CachedProfile).with_status(VerificationStatus::Pending),
    )
    .await;

    assert_eq!(approvals(&drain(&mut events)), 1);
    assert_eq!(s.step().await, Step::ProfileUnlocked);
    assert_eq!(s.next_poll_delay().await, None);
}

#[tokio::test]
async fn denial_shows_reason_and_hides_document() {
    let api = Arc::new(NullPortalApi::new());
    api.set_profile(profile_response(
        Some("denied"),
        Some("docs/a.png"),
        Some("blurry image"),
    ));
    let s = session(&api);

    let cached = SourceReport::new(SourceKind::CachedProfile)
        .with_status(VerificationStatus::Pending)
        .with_document(DocumentRef::remote("docs/a.png"));
    let record = s.load([cached]).await.unwrap();

    assert_eq!(record.status, VerificationStatus::Denied);
    assert_eq!(record.document_ref, None);
    assert_eq!(
        s.step().await,
        Step::Upload {
            denial_reason: Some("blurry image".into())
        }
    );
}

#[tokio::test]
async fn denied_resident_can_upload_again() {
    let api = Arc::new(NullPortalApi::new());
    api.set_profile(profile_response(Some("denied"), None, Some("expired ID")));
    api.set_upload_path("docs/b.png");
    let s = session(&api);
    s.load([]).await.unwrap();

    let record = s.upload(&png(64)).await.unwrap();
    assert_eq!(record.status, VerificationStatus::Pending);
    assert_eq!(record.denial_reason, None);
    assert_eq!(s.step().await, Step::UnderReview);
}

#[tokio::test]
async fn invalid_documents_rejected_without_network() {
    let api = Arc::new(NullPortalApi::new());
    let s = session(&api);

    let err = s.upload(&png(6 * 1024 * 1024)).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Resident(ResidentError::FileTooLarge { .. })
    ));

    let text = UploadFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let err = s.upload(&text).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Resident(ResidentError::InvalidFileType(_))
    ));

    assert_eq!(api.call_count(), 0);
    assert_eq!(s.record().await.status, VerificationStatus::None);
}

#[tokio::test]
async fn failed_upload_leaves_record_untouched() {
    let api = Arc::new(NullPortalApi::new());
    api.set_profile(profile_response(Some("none"), None, None));
    api.push_upload(Err(ClientError::Server {
        status: 500,
        message: Some("Storage unavailable".into()),
    }));
    let s = session(&api);
    let before = s.load([]).await.unwrap();

    let err = s.upload(&png(64)).await.unwrap_err();
    match err {
        SessionError::Resident(e) => assert_eq!(e.user_message(), "Storage unavailable"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(s.record().await, before);
}

#[tokio::test]
async fn empty_receipt_code_rejected_locally() {
    let api = Arc::new(NullPortalApi::new());
    let s = session(&api);

    let err = s
        .validate_receipt(&BeneficiaryId::from(7), &ReceiptSubmission::new("   "))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Resident(ResidentError::MissingReceiptCode)
    ));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn invalid_receipt_gets_friendly_message() {
    let api = Arc::new(NullPortalApi::new());
    api.push_receipt(Err(ClientError::Server {
        status: 422,
        message: Some("Invalid receipt number for beneficiary 7".into()),
    }));
    let s = session(&api);

    let err = s
        .validate_receipt(&BeneficiaryId::from(7), &ReceiptSubmission::new("RCP-BAD"))
        .await
        .unwrap_err();
    match err {
        SessionError::Resident(e) => assert_eq!(e.user_message(), INVALID_RECEIPT_MESSAGE),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!s.record().await.receipt_validated);
}

#[tokio::test]
async fn validated_receipt_refetches_tracking() {
    let api = Arc::new(NullPortalApi::new());
    api.push_receipt(Ok(beneficiary(7, "approved", true)));
    api.set_benefits(vec![
        beneficiary(3, "pending", false),
        beneficiary(7, "approved", true),
    ]);
    let s = session(&api);

    let submission = ReceiptSubmission::new("RCP-001").with_comment("received in full");
    let tracking = s
        .validate_receipt(&BeneficiaryId::from(7), &submission)
        .await
        .unwrap();

    assert_eq!(tracking.stage, TrackingStage::Completed);
    assert!(s.record().await.receipt_validated);
    assert_eq!(
        api.calls(),
        vec![
            NullCall::ValidateReceipt {
                beneficiary: BeneficiaryId::from(7),
                receipt_number: "RCP-001".into(),
                comment: Some("received in full".into()),
                has_proof: false,
            },
            NullCall::FetchBenefits,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn poller_runs_fast_after_upload_then_stops_on_approval() {
    let api = Arc::new(NullPortalApi::new());
    api.set_profile(profile_response(Some("none"), None, None));
    api.set_upload_path("docs/a.png");
    let s = session(&api);
    s.load([]).await.unwrap();
    s.upload(&png(256)).await.unwrap();

    api.push_status(Err(ClientError::Unreachable("offline".into())));
    api.push_status(Ok(StatusResponse {
        verification_status: Some("pending".into()),
    }));
    api.set_status("approved");
    api.set_profile(profile_response(Some("approved"), Some("docs/a.png"), None));

    let mut events = s.subscribe();
    let started = tokio::time::Instant::now();
    let mut poller = StatusPoller::new(s.clone());
    poller.start();
    assert_eq!(poller.join().await, Some(PollerExit::Approved));

    // 2s (failed) + 2s (pending arrives) + 3s (approved).
    assert_eq!(started.elapsed(), Duration::from_secs(7));
    assert_eq!(api.count(|c| *c == NullCall::FetchStatus), 3);
    assert_eq!(approvals(&drain(&mut events)), 1);
    assert_eq!(s.step().await, Step::ProfileUnlocked);
}

#[tokio::test]
async fn congratulation_flag_persists_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags.json");
    let api = Arc::new(NullPortalApi::new());
    api.set_profile(profile_response(Some("approved"), Some("docs/a.png"), None));

    let first = session_with(&api, Arc::new(JsonFileStore::open(&path).unwrap()));
    let mut events = first.subscribe();
    first.load([]).await.unwrap();
    assert!(drain(&mut events).contains(&PortalEvent::Approved {
        show_congratulations: true
    }));

    let reopened = session_with(&api, Arc::new(JsonFileStore::open(&path).unwrap()));
    let mut events = reopened.subscribe();
    reopened.load([]).await.unwrap();
    assert!(drain(&mut events).contains(&PortalEvent::Approved {
        show_congratulations: false
    }));
}

/// Holds every status response until released, so a poll can be left in
/// flight while other operations run.
struct HeldStatusApi {
    inner: Arc<NullPortalApi>,
    release: Notify,
}

#[async_trait]
impl PortalApi for HeldStatusApi {
    async fn fetch_profile(&self) -> Result<ProfileResponse, ClientError> {
        self.inner.fetch_profile().await
    }

    async fn fetch_status(&self) -> Result<StatusResponse, ClientError> {
        let reply = self.inner.fetch_status().await;
        self.release.notified().await;
        reply
    }

    async fn upload_residency_document(
        &self,
        file: &UploadFile,
    ) -> Result<UploadResponse, ClientError> {
        self.inner.upload_residency_document(file).await
    }

    async fn fetch_benefits(&self) -> Result<Vec<BeneficiaryRecord>, ClientError> {
        self.inner.fetch_benefits().await
    }

    async fn validate_receipt(
        &self,
        beneficiary: &BeneficiaryId,
        request: &ReceiptRequest,
    ) -> Result<BeneficiaryRecord, ClientError> {
        self.inner.validate_receipt(beneficiary, request).await
    }
}

#[tokio::test]
async fn poll_sent_before_upload_keeps_fast_cadence() {
    let inner = Arc::new(NullPortalApi::new());
    inner.set_profile(profile_response(Some("none"), None, None));
    inner.set_status("none");
    inner.set_upload_path("docs/a.png");
    let api = Arc::new(HeldStatusApi {
        inner: Arc::clone(&inner),
        release: Notify::new(),
    });
    let s = VerificationSession::new(
        ResidentId::new("res-42"),
        Arc::clone(&api) as Arc<dyn PortalApi>,
        Arc::new(NullFlagStore::new()),
    );
    s.load([]).await.unwrap();

    let in_flight = tokio::spawn({
        let s = s.clone();
        async move { s.poll_once().await }
    });
    while inner.count(|c| *c == NullCall::FetchStatus) == 0 {
        tokio::task::yield_now().await;
    }

    s.upload(&png(512)).await.unwrap();
    api.release.notify_one();
    let record = in_flight.await.unwrap().unwrap();

    assert_eq!(record.status, VerificationStatus::Pending);
    assert_eq!(s.step().await, Step::UnderReview);
    assert_eq!(s.next_poll_delay().await, Some(Duration::from_secs(2)));
}
