//! HTTP client for the barangay portal REST backend.
//!
//! The backend owns every record; this crate only speaks its JSON/multipart
//! dialect. Consumers program against the [`PortalApi`] trait so the
//! verification flow can run against [`PortalClient`] in production and a
//! scripted double in tests.
//!
//! Endpoints:
//! - `GET  /profile` → full profile incl. verification fields
//! - `GET  /profile/status` → `{ verification_status }`
//! - `POST /profile/upload-residency-verification` (multipart) → `{ image_path }`
//! - `GET  /my-benefits` → the resident's beneficiary records
//! - `POST /my-benefits/{id}/validate-receipt` (multipart) → updated record

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::PortalApi;
pub use client::PortalClient;
pub use error::ClientError;
pub use types::{BeneficiaryRecord, ProfileResponse, ReceiptRequest, StatusResponse, UploadResponse};
