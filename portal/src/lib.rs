//! Residency verification session for one resident.
//!
//! The session is the host-facing coordinator that:
//! - Reconciles status from the host's sources and a live profile fetch
//! - Classifies the record into the UI step to render
//! - Polls the backend while verification is unresolved
//! - Runs document upload and receipt validation against the backend
//! - Announces approval once, remembering the congratulation across restarts
//!
//! Hosts call [`StatusPoller::start`] / [`StatusPoller::stop`] on mount and
//! unmount and listen to [`PortalEvent`]s via [`VerificationSession::subscribe`].

pub mod config;
pub mod error;
pub mod events;
pub mod poller;
pub mod session;
pub mod shutdown;

pub use config::PortalConfig;
pub use error::SessionError;
pub use events::PortalEvent;
pub use poller::{PollerExit, StatusPoller};
pub use session::VerificationSession;
pub use shutdown::{ShutdownController, ShutdownSignal};
