//! How often to re-fetch status while verification is unresolved.

use std::time::Duration;

use crate::state::ReconciliationState;

pub const DEFAULT_STEADY_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_FAST_INTERVAL: Duration = Duration::from_secs(2);

/// Poll schedule derived from the current reconciliation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollCadence {
    /// Interval while a status is known but unresolved.
    pub steady: Duration,
    /// Interval right after an upload, until the server reports a status.
    pub fast: Duration,
}

impl PollCadence {
    pub fn new(steady: Duration, fast: Duration) -> Self {
        Self { steady, fast }
    }

    /// Delay before the next poll, or `None` when polling should stop.
    pub fn next(&self, state: &ReconciliationState) -> Option<Duration> {
        if state.is_approved() {
            None
        } else if state.awaiting_first_status() {
            Some(self.fast)
        } else {
            Some(self.steady)
        }
    }
}

impl Default for PollCadence {
    fn default() -> Self {
        Self::new(DEFAULT_STEADY_INTERVAL, DEFAULT_FAST_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceKind, SourceReport};
    use brgy_types::{DocumentRef, VerificationStatus};

    #[test]
    fn fast_after_upload_then_steady() {
        let cadence = PollCadence::default();
        let mut state = ReconciliationState::new();
        assert_eq!(cadence.next(&state), Some(DEFAULT_STEADY_INTERVAL));

        state.record_upload(DocumentRef::local("a.png")).unwrap();
        assert_eq!(cadence.next(&state), Some(DEFAULT_FAST_INTERVAL));

        state.apply(SourceReport::new(SourceKind::LiveFetch).with_status(VerificationStatus::Pending));
        assert_eq!(cadence.next(&state), Some(DEFAULT_STEADY_INTERVAL));
    }

    #[test]
    fn stops_once_approved() {
        let cadence = PollCadence::default();
        let mut state = ReconciliationState::new();
        state.apply(SourceReport::new(SourceKind::LiveFetch).with_status(VerificationStatus::Approved));
        assert_eq!(cadence.next(&state), None);
    }
}
