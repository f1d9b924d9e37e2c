use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("portal unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("portal returned HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        /// Message the backend put in the error body, if any.
        message: Option<String>,
    },

    #[error("invalid response from portal: {0}")]
    InvalidResponse(String),

    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// The backend-supplied message, when the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether retrying later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::RequestFailed(_) => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}
