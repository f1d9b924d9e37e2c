//! Nullable infrastructure for deterministic testing.
//!
//! The external dependencies of the verification flow (portal backend and
//! flag persistence) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return scripted values
//! - Record every call for assertions
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod api;
pub mod store;

pub use api::{profile_response, NullCall, NullPortalApi};
pub use store::NullFlagStore;
