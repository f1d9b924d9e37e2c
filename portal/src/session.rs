//! The verification session: one resident, one authoritative record.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};

use brgy_client::PortalApi;
use brgy_resident::{
    fetch_tracking, profile_report, status_report, submit_receipt, upload_residency_document,
    BenefitTracking, DocumentPolicy, ReceiptSubmission, ResidentError,
};
use brgy_store::{congrats_shown_key, FlagStore, JsonFileStore};
use brgy_types::{BeneficiaryId, ResidentId, UploadFile};
use brgy_verification::{
    PollCadence, ReconciliationState, SourceKind, SourceReport, Step, Transition,
    VerificationError, VerificationRecord,
};

use crate::config::PortalConfig;
use crate::error::SessionError;
use crate::events::PortalEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Host-facing handle on a resident's verification flow.
///
/// Cheap to clone; clones share the same state, event channel and backend.
/// Network calls are made without holding the state lock, so a slow request
/// never blocks readers. Responses that arrive out of order are folded in by
/// [`ReconciliationState`], which keeps an approval once seen.
#[derive(Clone)]
pub struct VerificationSession {
    resident: ResidentId,
    api: Arc<dyn PortalApi>,
    flags: Arc<dyn FlagStore>,
    state: Arc<Mutex<ReconciliationState>>,
    events: broadcast::Sender<PortalEvent>,
    cadence: PollCadence,
    upload_policy: DocumentPolicy,
    proof_policy: DocumentPolicy,
}

impl VerificationSession {
    pub fn new(resident: ResidentId, api: Arc<dyn PortalApi>, flags: Arc<dyn FlagStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            resident,
            api,
            flags,
            state: Arc::new(Mutex::new(ReconciliationState::new())),
            events,
            cadence: PollCadence::default(),
            upload_policy: DocumentPolicy::residency(),
            proof_policy: DocumentPolicy::receipt_proof(),
        }
    }

    /// Wire a session to the HTTP backend and the file flag store.
    pub fn from_config(config: &PortalConfig, resident: ResidentId) -> Result<Self, SessionError> {
        config.validate()?;
        let client = config.build_client()?;
        let flags = JsonFileStore::open(&config.flag_store_path)?;
        tracing::debug!(resident = %resident, path = %flags.path().display(), "flag store opened");
        Ok(Self::new(resident, Arc::new(client), Arc::new(flags))
            .with_cadence(config.cadence())
            .with_upload_policy(config.upload_policy())
            .with_proof_policy(config.proof_policy()))
    }

    pub fn with_cadence(mut self, cadence: PollCadence) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn with_upload_policy(mut self, policy: DocumentPolicy) -> Self {
        self.upload_policy = policy;
        self
    }

    pub fn with_proof_policy(mut self, policy: DocumentPolicy) -> Self {
        self.proof_policy = policy;
        self
    }

    pub fn resident(&self) -> &ResidentId {
        &self.resident
    }

    /// Receive record changes and the approval announcement.
    pub fn subscribe(&self) -> broadcast::Receiver<PortalEvent> {
        self.events.subscribe()
    }

    /// Initial load: fold in whatever the host already holds, then fetch
    /// the live profile.
    ///
    /// A failed live fetch is logged and the host-provided sources stand.
    pub async fn load(
        &self,
        host_sources: impl IntoIterator<Item = SourceReport>,
    ) -> Result<VerificationRecord, SessionError> {
        {
            let mut state = self.state.lock().await;
            let previous = state.record().clone();
            let mut newly_approved = false;
            for report in host_sources {
                newly_approved |= state.apply(report).newly_approved;
            }
            let transition = Transition {
                previous,
                record: state.record().clone(),
                newly_approved,
            };
            self.publish(&transition).await;
        }

        match self.refresh().await {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(resident = %self.resident, error = %e, "live profile fetch failed; using host sources");
                Ok(self.record().await)
            }
        }
    }

    /// Fetch the full profile and fold it in.
    pub async fn refresh(&self) -> Result<VerificationRecord, SessionError> {
        let generation = self.state.lock().await.upload_generation();
        let profile = self.api.fetch_profile().await?;
        let transition = self
            .apply_fetched(profile_report(SourceKind::LiveFetch, &profile), generation)
            .await;
        Ok(transition.record)
    }

    /// One poll tick: check the status, and re-read the profile when the
    /// status moved so the document and denial reason follow.
    pub async fn poll_once(&self) -> Result<VerificationRecord, SessionError> {
        let generation = self.state.lock().await.upload_generation();
        let status = self.api.fetch_status().await?;
        let transition = self.apply_fetched(status_report(&status), generation).await;
        tracing::debug!(
            resident = %self.resident,
            status = %transition.record.status,
            "status polled"
        );

        if transition.previous.status == transition.record.status {
            return Ok(transition.record);
        }
        match self.refresh().await {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(resident = %self.resident, error = %e, "profile refresh after status change failed");
                Ok(transition.record)
            }
        }
    }

    /// Fold one report into the state and publish what changed.
    pub async fn apply_source(&self, report: SourceReport) -> Transition {
        let mut state = self.state.lock().await;
        let generation = state.upload_generation();
        self.fold(&mut state, report, generation).await
    }

    /// Fold in a live response whose request left at `generation`.
    async fn apply_fetched(&self, report: SourceReport, generation: u64) -> Transition {
        let mut state = self.state.lock().await;
        self.fold(&mut state, report, generation).await
    }

    async fn fold(
        &self,
        state: &mut ReconciliationState,
        report: SourceReport,
        generation: u64,
    ) -> Transition {
        let source = report.kind.as_str();
        let stale = generation != state.upload_generation();
        let transition = state.apply_observed(report, generation);
        tracing::debug!(resident = %self.resident, source, stale, changed = transition.changed(), "source applied");
        self.publish(&transition).await;
        transition
    }

    /// Validate and upload a residency document, moving the record to
    /// pending review.
    pub async fn upload(&self, file: &UploadFile) -> Result<VerificationRecord, SessionError> {
        if self.state.lock().await.is_approved() {
            return Err(ResidentError::AlreadyApproved.into());
        }

        let document_ref =
            upload_residency_document(self.api.as_ref(), &self.upload_policy, file).await?;

        let mut state = self.state.lock().await;
        match state.record_upload(document_ref) {
            Ok(transition) => self.publish(&transition).await,
            Err(VerificationError::AlreadyApproved) => {
                tracing::info!(resident = %self.resident, "approval arrived during upload; keeping approved record");
            }
        }
        Ok(state.record().clone())
    }

    /// Submit a payout receipt for one enrollment and return its updated
    /// tracking entry.
    pub async fn validate_receipt(
        &self,
        beneficiary: &BeneficiaryId,
        submission: &ReceiptSubmission,
    ) -> Result<BenefitTracking, SessionError> {
        let record =
            submit_receipt(self.api.as_ref(), beneficiary, submission, &self.proof_policy).await?;

        {
            let mut state = self.state.lock().await;
            let transition = state.mark_receipt_validated();
            self.publish(&transition).await;
        }

        match fetch_tracking(self.api.as_ref()).await {
            Ok(entries) => Ok(entries
                .into_iter()
                .find(|entry| entry.id == *beneficiary)
                .unwrap_or_else(|| BenefitTracking::from(&record))),
            Err(e) => {
                tracing::warn!(beneficiary = %beneficiary, error = %e, "benefit refresh after receipt validation failed");
                Ok(BenefitTracking::from(&record))
            }
        }
    }

    pub async fn benefits(&self) -> Result<Vec<BenefitTracking>, SessionError> {
        Ok(fetch_tracking(self.api.as_ref()).await?)
    }

    pub async fn record(&self) -> VerificationRecord {
        self.state.lock().await.record().clone()
    }

    pub async fn step(&self) -> Step {
        self.state.lock().await.step()
    }

    /// Delay before the next status poll, `None` once polling is done.
    pub async fn next_poll_delay(&self) -> Option<Duration> {
        let state = self.state.lock().await;
        self.cadence.next(&state)
    }

    /// Publish a transition. Called with the state lock held so events
    /// leave in the order the state changed.
    async fn publish(&self, transition: &Transition) {
        if transition.changed() {
            let step = brgy_verification::classify(&transition.record);
            tracing::info!(
                resident = %self.resident,
                status = %transition.record.status,
                step = step.as_str(),
                "verification record changed"
            );
            let _ = self.events.send(PortalEvent::RecordChanged {
                record: transition.record.clone(),
                step,
            });
        }
        if transition.newly_approved {
            let show_congratulations = self.claim_congratulations().await;
            tracing::info!(resident = %self.resident, show_congratulations, "residency approved");
            let _ = self.events.send(PortalEvent::Approved {
                show_congratulations,
            });
        }
    }

    /// True if the congratulation has never been shown; marks it shown.
    ///
    /// Flag stores may touch the disk, so the lookup runs on the blocking pool.
    async fn claim_congratulations(&self) -> bool {
        let flags = Arc::clone(&self.flags);
        let key = congrats_shown_key(self.resident.as_str());
        match tokio::task::spawn_blocking(move || claim_flag(flags.as_ref(), &key)).await {
            Ok(show) => show,
            Err(e) => {
                tracing::warn!(resident = %self.resident, error = %e, "congratulation flag task failed");
                true
            }
        }
    }
}

fn claim_flag(flags: &dyn FlagStore, key: &str) -> bool {
    match flags.is_set(key) {
        Ok(true) => false,
        Ok(false) => {
            if let Err(e) = flags.mark(key) {
                tracing::warn!(key, error = %e, "could not persist congratulation flag");
            }
            true
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read congratulation flag");
            true
        }
    }
}
