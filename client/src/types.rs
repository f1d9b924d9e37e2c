//! Request and response bodies exchanged with the portal backend.

use brgy_types::{BeneficiaryId, BeneficiaryStatus, DocumentRef, UploadFile, VerificationStatus};
use serde::{Deserialize, Serialize};

/// `GET /profile`. Only the verification fields are typed; the rest of the
/// profile is kept as raw JSON for callers that want it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub verification_status: Option<String>,
    #[serde(default)]
    pub residency_verification_image: Option<String>,
    #[serde(default)]
    pub denial_reason: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProfileResponse {
    /// The parsed verification status; `None` if absent or unrecognised.
    pub fn status(&self) -> Option<VerificationStatus> {
        parse_status(self.verification_status.as_deref())
    }

    pub fn document_ref(&self) -> Option<DocumentRef> {
        DocumentRef::from_server_path(self.residency_verification_image.as_deref())
    }

    pub fn denial_reason(&self) -> Option<&str> {
        self.denial_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// `GET /profile/status`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub verification_status: Option<String>,
}

impl StatusResponse {
    pub fn status(&self) -> Option<VerificationStatus> {
        parse_status(self.verification_status.as_deref())
    }
}

/// `POST /profile/upload-residency-verification`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn document_ref(&self) -> Option<DocumentRef> {
        DocumentRef::from_server_path(self.image_path.as_deref())
    }
}

/// One of the resident's program enrollments, as returned by `/my-benefits`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BeneficiaryRecord {
    pub id: BeneficiaryId,
    #[serde(default)]
    pub program_name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub receipt_validated: bool,
    #[serde(default)]
    pub receipt_validated_at: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl BeneficiaryRecord {
    pub fn status(&self) -> Option<BeneficiaryStatus> {
        self.status.parse().ok()
    }
}

/// Multipart fields for `POST /my-benefits/{id}/validate-receipt`.
#[derive(Debug, Clone)]
pub struct ReceiptRequest {
    pub receipt_number: String,
    pub comment: Option<String>,
    pub proof_file: Option<UploadFile>,
}

/// The backend has returned lists both bare and wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum BenefitListing {
    Bare(Vec<BeneficiaryRecord>),
    Wrapped { data: Vec<BeneficiaryRecord> },
}

impl BenefitListing {
    pub(crate) fn into_records(self) -> Vec<BeneficiaryRecord> {
        match self {
            Self::Bare(records) | Self::Wrapped { data: records } => records,
        }
    }
}

/// Receipt validation answers with the record itself or `{ beneficiary }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum BeneficiaryEnvelope {
    Wrapped { beneficiary: BeneficiaryRecord },
    Bare(BeneficiaryRecord),
}

impl BeneficiaryEnvelope {
    pub(crate) fn into_record(self) -> BeneficiaryRecord {
        match self {
            Self::Wrapped { beneficiary } | Self::Bare(beneficiary) => beneficiary,
        }
    }
}

fn parse_status(raw: Option<&str>) -> Option<VerificationStatus> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!("ignoring verification status from portal: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_keeps_unknown_fields() {
        let json = r#"{
            "verification_status": "denied",
            "residency_verification_image": "docs/a.png",
            "denial_reason": "blurry image",
            "first_name": "Ana",
            "purok": 4
        }"#;
        let profile: ProfileResponse = serde_json::from_str(json).unwrap();
        assert_eq!(profile.status(), Some(VerificationStatus::Denied));
        assert_eq!(profile.document_ref(), Some(DocumentRef::remote("docs/a.png")));
        assert_eq!(profile.denial_reason(), Some("blurry image"));
        assert_eq!(profile.extra["first_name"], "Ana");
    }

    #[test]
    fn null_and_unknown_status_are_absent() {
        let profile: ProfileResponse =
            serde_json::from_str(r#"{"verification_status": null}"#).unwrap();
        assert_eq!(profile.status(), None);
        let status: StatusResponse =
            serde_json::from_str(r#"{"verification_status": "archived"}"#).unwrap();
        assert_eq!(status.status(), None);
    }

    #[test]
    fn upload_response_without_path() {
        let resp: UploadResponse = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert_eq!(resp.document_ref(), None);
    }

    #[test]
    fn benefit_listing_shapes() {
        let bare: BenefitListing =
            serde_json::from_str(r#"[{"id": 3, "status": "approved"}]"#).unwrap();
        let wrapped: BenefitListing =
            serde_json::from_str(r#"{"data": [{"id": "3", "status": "approved"}]}"#).unwrap();
        assert_eq!(bare.into_records(), wrapped.into_records());
    }

    #[test]
    fn beneficiary_envelope_shapes() {
        let wrapped: BeneficiaryEnvelope = serde_json::from_str(
            r#"{"beneficiary": {"id": 9, "status": "approved", "receipt_validated": true}}"#,
        )
        .unwrap();
        let record = wrapped.into_record();
        assert!(record.receipt_validated);
        assert_eq!(record.status(), Some(BeneficiaryStatus::Approved));
    }
}
