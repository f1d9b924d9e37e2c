//! The backend operations the resident flow depends on.

use async_trait::async_trait;
use brgy_types::{BeneficiaryId, UploadFile};

use crate::error::ClientError;
use crate::types::{BeneficiaryRecord, ProfileResponse, ReceiptRequest, StatusResponse, UploadResponse};

#[async_trait]
pub trait PortalApi: Send + Sync {
    /// `GET /profile`
    async fn fetch_profile(&self) -> Result<ProfileResponse, ClientError>;

    /// `GET /profile/status`
    async fn fetch_status(&self) -> Result<StatusResponse, ClientError>;

    /// `POST /profile/upload-residency-verification`
    async fn upload_residency_document(
        &self,
        file: &UploadFile,
    ) -> Result<UploadResponse, ClientError>;

    /// `GET /my-benefits`
    async fn fetch_benefits(&self) -> Result<Vec<BeneficiaryRecord>, ClientError>;

    /// `POST /my-benefits/{id}/validate-receipt`
    async fn validate_receipt(
        &self,
        beneficiary: &BeneficiaryId,
        request: &ReceiptRequest,
    ) -> Result<BeneficiaryRecord, ClientError>;
}
