//! reqwest-backed implementation of [`PortalApi`].

use std::time::Duration;

use async_trait::async_trait;
use brgy_types::{BeneficiaryId, UploadFile};
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::api::PortalApi;
use crate::error::ClientError;
use crate::types::{
    BeneficiaryEnvelope, BeneficiaryRecord, BenefitListing, ProfileResponse, ReceiptRequest,
    StatusResponse, UploadResponse,
};

/// Default timeout for portal requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for one resident's session against the portal backend.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
    /// Bearer token issued by the external auth service.
    api_token: Option<String>,
}

impl PortalClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8000/api`) with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeouts(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            api_token: None,
        })
    }

    /// Attach the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.post(self.url(path)))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(reqwest::header::ACCEPT, "application/json");
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a JSON success body, turning non-2xx
    /// responses into [`ClientError::Server`] with the backend's message.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = server_message(&body);
            tracing::debug!(status = status.as_u16(), ?message, "portal request rejected");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("failed to parse portal response: {e}"))
        })
    }
}

fn file_part(file: &UploadFile) -> Result<Part, ClientError> {
    Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.media_type)
        .map_err(|e| ClientError::Other(format!("invalid media type {:?}: {e}", file.media_type)))
}

/// Extract a human-readable message from an error body.
///
/// JSON bodies are searched for `message`, `error` and `detail`; short
/// plain-text bodies are used as-is; HTML error pages are ignored.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(json) => ["message", "error", "detail"]
            .iter()
            .find_map(|key| json.get(key).and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        Err(_) if !trimmed.starts_with('<') && trimmed.len() <= 200 => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

#[async_trait]
impl PortalApi for PortalClient {
    async fn fetch_profile(&self) -> Result<ProfileResponse, ClientError> {
        self.send_json(self.get("profile")).await
    }

    async fn fetch_status(&self) -> Result<StatusResponse, ClientError> {
        self.send_json(self.get("profile/status")).await
    }

    async fn upload_residency_document(
        &self,
        file: &UploadFile,
    ) -> Result<UploadResponse, ClientError> {
        let form = Form::new().part("residency_verification_image", file_part(file)?);
        self.send_json(self.post("profile/upload-residency-verification").multipart(form))
            .await
    }

    async fn fetch_benefits(&self) -> Result<Vec<BeneficiaryRecord>, ClientError> {
        let listing: BenefitListing = self.send_json(self.get("my-benefits")).await?;
        Ok(listing.into_records())
    }

    async fn validate_receipt(
        &self,
        beneficiary: &BeneficiaryId,
        request: &ReceiptRequest,
    ) -> Result<BeneficiaryRecord, ClientError> {
        let mut form = Form::new().text("receipt_number", request.receipt_number.clone());
        if let Some(comment) = &request.comment {
            form = form.text("comment", comment.clone());
        }
        if let Some(proof) = &request.proof_file {
            form = form.part("proof_file", file_part(proof)?);
        }
        let path = format!("my-benefits/{beneficiary}/validate-receipt");
        let envelope: BeneficiaryEnvelope = self.send_json(self.post(&path).multipart(form)).await?;
        Ok(envelope.into_record())
    }
}
