use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("residency is already approved; no further uploads are accepted")]
    AlreadyApproved,
}
