//! Nullable portal backend with scripted responses and recorded calls.

use async_trait::async_trait;
use brgy_client::{
    BeneficiaryRecord, ClientError, PortalApi, ProfileResponse, ReceiptRequest, StatusResponse,
    UploadResponse,
};
use brgy_types::{BeneficiaryId, UploadFile};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request the code under test made against the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NullCall {
    FetchProfile,
    FetchStatus,
    Upload {
        file_name: String,
        media_type: String,
        len: usize,
    },
    FetchBenefits,
    ValidateReceipt {
        beneficiary: BeneficiaryId,
        receipt_number: String,
        comment: Option<String>,
        has_proof: bool,
    },
}

/// Responses for one endpoint: queued one-shot replies first, then a
/// repeating fallback. With neither, calls fail as unreachable.
struct Script<T> {
    queue: Mutex<VecDeque<Result<T, ClientError>>>,
    fallback: Mutex<Option<T>>,
}

impl<T: Clone> Script<T> {
    fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
        }
    }

    fn push(&self, reply: Result<T, ClientError>) {
        self.queue.lock().unwrap().push_back(reply);
    }

    fn set(&self, value: T) {
        *self.fallback.lock().unwrap() = Some(value);
    }

    fn next(&self, endpoint: &str) -> Result<T, ClientError> {
        if let Some(reply) = self.queue.lock().unwrap().pop_front() {
            return reply;
        }
        self.fallback
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::Unreachable(format!("no scripted reply for {endpoint}")))
    }
}

/// A [`PortalApi`] that never touches the network.
pub struct NullPortalApi {
    calls: Mutex<Vec<NullCall>>,
    profile: Script<ProfileResponse>,
    status: Script<StatusResponse>,
    upload: Script<UploadResponse>,
    benefits: Script<Vec<BeneficiaryRecord>>,
    receipt: Script<BeneficiaryRecord>,
}

impl NullPortalApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            profile: Script::new(),
            status: Script::new(),
            upload: Script::new(),
            benefits: Script::new(),
            receipt: Script::new(),
        }
    }

    /// Profile returned by every `fetch_profile` once the queue is drained.
    pub fn set_profile(&self, profile: ProfileResponse) {
        self.profile.set(profile);
    }

    pub fn push_profile(&self, reply: Result<ProfileResponse, ClientError>) {
        self.profile.push(reply);
    }

    /// Status returned by every `fetch_status` once the queue is drained.
    pub fn set_status(&self, status: &str) {
        self.status.set(StatusResponse {
            verification_status: Some(status.to_string()),
        });
    }

    pub fn push_status(&self, reply: Result<StatusResponse, ClientError>) {
        self.status.push(reply);
    }

    pub fn push_upload(&self, reply: Result<UploadResponse, ClientError>) {
        self.upload.push(reply);
    }

    /// Upload answer that reports the given storage path.
    pub fn set_upload_path(&self, path: &str) {
        self.upload.set(UploadResponse {
            image_path: Some(path.to_string()),
            message: None,
        });
    }

    pub fn set_benefits(&self, records: Vec<BeneficiaryRecord>) {
        self.benefits.set(records);
    }

    pub fn push_receipt(&self, reply: Result<BeneficiaryRecord, ClientError>) {
        self.receipt.push(reply);
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<NullCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn count(&self, pred: impl Fn(&NullCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: NullCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for NullPortalApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortalApi for NullPortalApi {
    async fn fetch_profile(&self) -> Result<ProfileResponse, ClientError> {
        self.record(NullCall::FetchProfile);
        self.profile.next("GET /profile")
    }

    async fn fetch_status(&self) -> Result<StatusResponse, ClientError> {
        self.record(NullCall::FetchStatus);
        self.status.next("GET /profile/status")
    }

    async fn upload_residency_document(
        &self,
        file: &UploadFile,
    ) -> Result<UploadResponse, ClientError> {
        self.record(NullCall::Upload {
            file_name: file.file_name.clone(),
            media_type: file.media_type.clone(),
            len: file.len(),
        });
        self.upload.next("POST /profile/upload-residency-verification")
    }

    async fn fetch_benefits(&self) -> Result<Vec<BeneficiaryRecord>, ClientError> {
        self.record(NullCall::FetchBenefits);
        self.benefits.next("GET /my-benefits")
    }

    async fn validate_receipt(
        &self,
        beneficiary: &BeneficiaryId,
        request: &ReceiptRequest,
    ) -> Result<BeneficiaryRecord, ClientError> {
        self.record(NullCall::ValidateReceipt {
            beneficiary: beneficiary.clone(),
            receipt_number: request.receipt_number.clone(),
            comment: request.comment.clone(),
            has_proof: request.proof_file.is_some(),
        });
        self.receipt.next("POST /my-benefits/{id}/validate-receipt")
    }
}

/// Build a profile body carrying just the verification fields.
pub fn profile_response(
    status: Option<&str>,
    image: Option<&str>,
    denial_reason: Option<&str>,
) -> ProfileResponse {
    ProfileResponse {
        verification_status: status.map(str::to_string),
        residency_verification_image: image.map(str::to_string),
        denial_reason: denial_reason.map(str::to_string),
        extra: serde_json::Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_replies_before_fallback() {
        let api = NullPortalApi::new();
        api.push_status(Err(ClientError::Unreachable("down".into())));
        api.set_status("pending");

        assert!(api.fetch_status().await.is_err());
        let status = api.fetch_status().await.unwrap();
        assert_eq!(status.verification_status.as_deref(), Some("pending"));
        assert_eq!(api.calls(), vec![NullCall::FetchStatus, NullCall::FetchStatus]);
    }

    #[tokio::test]
    async fn unscripted_endpoint_is_unreachable() {
        let api = NullPortalApi::new();
        assert!(matches!(
            api.fetch_profile().await,
            Err(ClientError::Unreachable(_))
        ));
        assert_eq!(api.call_count(), 1);
    }
}
