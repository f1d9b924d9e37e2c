//! Residency document upload.

use brgy_client::PortalApi;
use brgy_types::{DocumentRef, UploadFile};

use crate::error::ResidentError;
use crate::policy::DocumentPolicy;

/// Validate `file` against `policy`, then submit it.
///
/// Returns the server's storage path, or a local reference when the server
/// accepted the file without reporting one. Invalid files never reach the
/// network.
pub async fn upload_residency_document(
    api: &dyn PortalApi,
    policy: &DocumentPolicy,
    file: &UploadFile,
) -> Result<DocumentRef, ResidentError> {
    policy.check(file)?;

    let response = api.upload_residency_document(file).await?;
    let document_ref = match response.document_ref() {
        Some(remote) => remote,
        None => {
            tracing::debug!(file = %file.file_name, "upload response had no image_path; keeping local reference");
            DocumentRef::local(file.file_name.clone())
        }
    };

    tracing::info!(document = %document_ref, bytes = file.len(), "residency document uploaded");
    Ok(document_ref)
}
