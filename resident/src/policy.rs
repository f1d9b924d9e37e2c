//! Local checks applied to files before they are sent anywhere.

use brgy_types::media;
use brgy_types::UploadFile;

use crate::error::ResidentError;

/// Upload size cap shared by residency documents and receipt proofs.
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// Which files an upload slot accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentPolicy {
    /// Accept any `image/*` type.
    pub any_image: bool,
    /// Additional exact media types accepted.
    pub extra_types: Vec<String>,
    pub max_bytes: usize,
}

impl DocumentPolicy {
    /// Proof-of-address documents: images only.
    pub fn residency() -> Self {
        Self {
            any_image: true,
            extra_types: Vec::new(),
            max_bytes: MAX_DOCUMENT_BYTES,
        }
    }

    /// Payout receipt proofs: images or PDF.
    pub fn receipt_proof() -> Self {
        Self {
            any_image: true,
            extra_types: vec![media::APPLICATION_PDF.to_string()],
            max_bytes: MAX_DOCUMENT_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn accepts_type(&self, media_type: &str) -> bool {
        let normalized = media::normalize(media_type);
        (self.any_image && media::is_image(&normalized))
            || self.extra_types.iter().any(|t| *t == normalized)
    }

    /// Type first, then size: a wrong type is reported even if also too large.
    pub fn check(&self, file: &UploadFile) -> Result<(), ResidentError> {
        if !self.accepts_type(&file.media_type) {
            return Err(ResidentError::InvalidFileType(file.media_type.clone()));
        }
        if file.is_empty() {
            return Err(ResidentError::EmptyDocument);
        }
        if file.len() > self.max_bytes {
            return Err(ResidentError::FileTooLarge {
                size: file.len(),
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self::residency()
    }
}
