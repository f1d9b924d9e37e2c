use brgy_resident::error::GENERIC_FAILURE_MESSAGE;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("config error: {0}")]
    Config(String),

    #[error("portal client error: {0}")]
    Client(#[from] brgy_client::ClientError),

    #[error("flag store error: {0}")]
    Store(#[from] brgy_store::StoreError),

    #[error("{0}")]
    Resident(#[from] brgy_resident::ResidentError),
}

impl SessionError {
    /// Text suitable for an inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Resident(e) => e.user_message(),
            Self::Client(e) => e
                .server_message()
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string(),
            Self::Config(_) | Self::Store(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
