//! Notifications the session publishes to its host.

use brgy_verification::{Step, VerificationRecord};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortalEvent {
    /// The reconciled record changed; re-render `step`.
    RecordChanged {
        record: VerificationRecord,
        step: Step,
    },
    /// Residency was approved. Published at most once per session;
    /// `show_congratulations` is false if the dialog was already shown in an
    /// earlier session.
    Approved { show_congratulations: bool },
}
