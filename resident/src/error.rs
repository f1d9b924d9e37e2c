use brgy_client::ClientError;
use brgy_verification::VerificationError;
use thiserror::Error;

/// Shown when the backend gave no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shown instead of the backend's raw "Invalid receipt number" error.
pub const INVALID_RECEIPT_MESSAGE: &str =
    "The receipt number you entered does not match our records. Please check it and try again.";

#[derive(Debug, Error)]
pub enum ResidentError {
    #[error("unsupported file type {0:?}")]
    InvalidFileType(String),

    #[error("file is too large: {size} bytes, limit {limit}")]
    FileTooLarge { size: usize, limit: usize },

    #[error("file is empty")]
    EmptyDocument,

    #[error("receipt number is required")]
    MissingReceiptCode,

    #[error("residency is already approved")]
    AlreadyApproved,

    #[error("invalid receipt number: {server_message}")]
    InvalidReceiptNumber { server_message: String },

    #[error(transparent)]
    Api(#[from] ClientError),
}

impl ResidentError {
    /// Text for the inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFileType(_) => "Please upload an image file (JPG or PNG).".to_string(),
            Self::FileTooLarge { limit, .. } => format!(
                "File is too large. Maximum size is {} MB.",
                limit / (1024 * 1024)
            ),
            Self::EmptyDocument => "The selected file is empty.".to_string(),
            Self::MissingReceiptCode => "Please enter the receipt number.".to_string(),
            Self::AlreadyApproved => {
                "Your residency is already verified; no new document is needed.".to_string()
            }
            Self::InvalidReceiptNumber { .. } => INVALID_RECEIPT_MESSAGE.to_string(),
            Self::Api(e) => e
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }
}

impl From<VerificationError> for ResidentError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::AlreadyApproved => Self::AlreadyApproved,
        }
    }
}
