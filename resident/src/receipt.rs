//! Payout receipt validation (post-approval stage).

use brgy_client::{BeneficiaryRecord, ClientError, PortalApi, ReceiptRequest};
use brgy_types::{BeneficiaryId, UploadFile};

use crate::error::ResidentError;
use crate::policy::DocumentPolicy;

/// Substring the backend uses when the code does not match the payout.
const INVALID_RECEIPT_MARKER: &str = "Invalid receipt number";

/// What the resident typed into the receipt form.
#[derive(Clone, Debug, Default)]
pub struct ReceiptSubmission {
    pub receipt_number: String,
    pub comment: Option<String>,
    pub proof_file: Option<UploadFile>,
}

impl ReceiptSubmission {
    pub fn new(receipt_number: impl Into<String>) -> Self {
        Self {
            receipt_number: receipt_number.into(),
            ..Default::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_proof(mut self, proof: UploadFile) -> Self {
        self.proof_file = Some(proof);
        self
    }

    /// Trim inputs and check them locally, producing the wire request.
    pub fn validate(&self, proof_policy: &DocumentPolicy) -> Result<ReceiptRequest, ResidentError> {
        let receipt_number = self.receipt_number.trim();
        if receipt_number.is_empty() {
            return Err(ResidentError::MissingReceiptCode);
        }
        if let Some(proof) = &self.proof_file {
            proof_policy.check(proof)?;
        }
        let comment = self
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(ReceiptRequest {
            receipt_number: receipt_number.to_string(),
            comment,
            proof_file: self.proof_file.clone(),
        })
    }
}

/// Validate and submit a receipt code for one beneficiary record.
pub async fn submit_receipt(
    api: &dyn PortalApi,
    beneficiary: &BeneficiaryId,
    submission: &ReceiptSubmission,
    proof_policy: &DocumentPolicy,
) -> Result<BeneficiaryRecord, ResidentError> {
    let request = submission.validate(proof_policy)?;

    match api.validate_receipt(beneficiary, &request).await {
        Ok(record) => {
            tracing::info!(%beneficiary, "receipt validated");
            Ok(record)
        }
        Err(e) => Err(classify_failure(e)),
    }
}

fn classify_failure(e: ClientError) -> ResidentError {
    match e.server_message() {
        Some(message) if message.contains(INVALID_RECEIPT_MARKER) => {
            ResidentError::InvalidReceiptNumber {
                server_message: message.to_string(),
            }
        }
        _ => ResidentError::Api(e),
    }
}
