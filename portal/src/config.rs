//! Client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use brgy_client::PortalClient;
use brgy_resident::DocumentPolicy;
use brgy_utils::LogFormat;
use brgy_verification::PollCadence;

use crate::SessionError;

/// Configuration for a resident client session.
///
/// Can be loaded from a TOML file via [`PortalConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Root URL of the portal REST backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token from the external auth service.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Poll interval while a status is known but unresolved.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Poll interval right after an upload, until the server reports a status.
    #[serde(default = "default_fast_poll_interval_ms")]
    pub fast_poll_interval_ms: u64,

    /// Upload size cap in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,

    /// File holding one-time flags (e.g. congratulation shown).
    #[serde(default = "default_flag_store_path")]
    pub flag_store_path: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_poll_interval_ms() -> u64 {
    3_000
}

fn default_fast_poll_interval_ms() -> u64 {
    2_000
}

fn default_max_document_bytes() -> usize {
    brgy_resident::policy::MAX_DOCUMENT_BYTES
}

fn default_flag_store_path() -> PathBuf {
    PathBuf::from("./brgy_flags.json")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PortalConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SessionError> {
        let config: Self = toml::from_str(s).map_err(|e| SessionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SessionError> {
        toml::to_string_pretty(self).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// Reject values that would make the session unusable.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.poll_interval_ms == 0 || self.fast_poll_interval_ms == 0 {
            return Err(SessionError::Config("poll intervals must be non-zero".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(SessionError::Config("request_timeout_secs must be non-zero".into()));
        }
        if self.max_document_bytes == 0 {
            return Err(SessionError::Config("max_document_bytes must be non-zero".into()));
        }
        self.log_format()?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, SessionError> {
        self.log_format.parse().map_err(SessionError::Config)
    }

    pub fn cadence(&self) -> PollCadence {
        PollCadence::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_millis(self.fast_poll_interval_ms),
        )
    }

    pub fn upload_policy(&self) -> DocumentPolicy {
        DocumentPolicy::residency().with_max_bytes(self.max_document_bytes)
    }

    pub fn proof_policy(&self) -> DocumentPolicy {
        DocumentPolicy::receipt_proof().with_max_bytes(self.max_document_bytes)
    }

    /// Build the HTTP client described by this configuration.
    pub fn build_client(&self) -> Result<PortalClient, SessionError> {
        let client = PortalClient::with_timeouts(
            &self.base_url,
            Duration::from_secs(self.request_timeout_secs),
            Duration::from_secs(self.connect_timeout_secs),
        )?;
        Ok(match &self.api_token {
            Some(token) => client.with_token(token),
            None => client,
        })
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            fast_poll_interval_ms: default_fast_poll_interval_ms(),
            max_document_bytes: default_max_document_bytes(),
            flag_store_path: default_flag_store_path(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
