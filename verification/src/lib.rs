//! Residency verification core.
//!
//! A resident's verification status can be learned from several places at
//! once: a fresh server fetch, a form the host UI passes in, a cached profile
//! and the profile embedded in the login session. This crate folds those into
//! one authoritative [`VerificationRecord`] and derives the UI [`Step`] from it.
//!
//! Two rules hold everywhere:
//! - **Approved is sticky.** Once any source reports `approved`, no later,
//!   staler or partial report can move the record back.
//! - **Denied carries no document.** A denied record forces a re-upload, so
//!   the previous document reference is never surfaced.
//!
//! Everything here is pure and synchronous; fetching, polling and persistence
//! live in the crates that host it.

pub mod cadence;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod source;
pub mod state;
pub mod step;

pub use cadence::PollCadence;
pub use error::VerificationError;
pub use reconcile::reconcile;
pub use record::VerificationRecord;
pub use source::{SourceKind, SourceReport};
pub use state::{ReconciliationState, Transition};
pub use step::{classify, Step};
