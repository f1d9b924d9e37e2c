//! Fundamental types for the barangay portal client.
//!
//! This crate defines the vocabulary shared across every other crate in the workspace:
//! resident and beneficiary identifiers, verification and enrollment states,
//! document references and the media types the portal accepts.

pub mod document;
pub mod error;
pub mod ids;
pub mod media;
pub mod state;

pub use document::{DocumentRef, UploadFile};
pub use error::PortalError;
pub use ids::{BeneficiaryId, ResidentId};
pub use state::{BeneficiaryStatus, VerificationStatus};
