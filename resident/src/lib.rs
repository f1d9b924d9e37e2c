//! Resident-facing operations of the barangay portal.
//!
//! Provides what a resident client needs beyond reading its verification
//! status:
//! - Residency document upload, with local type and size checks
//! - Payout receipt validation, with the invalid-receipt message mapped
//! - Benefit tracking stages derived from beneficiary records
//! - Conversion of profile bodies into reconciliation source reports
//!
//! Every operation validates locally first and only then calls the backend.
//! Failures are returned as [`ResidentError`], whose
//! [`user_message`](ResidentError::user_message) is the banner text.

pub mod error;
pub mod policy;
pub mod profile;
pub mod receipt;
pub mod tracking;
pub mod upload;

pub use error::ResidentError;
pub use policy::DocumentPolicy;
pub use profile::{profile_report, status_report};
pub use receipt::{submit_receipt, ReceiptSubmission};
pub use tracking::{fetch_tracking, BenefitTracking, TrackingStage};
pub use upload::upload_residency_document;
