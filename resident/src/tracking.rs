//! Benefit tracking: where each program enrollment stands.

use brgy_client::{BeneficiaryRecord, PortalApi};
use brgy_types::{BeneficiaryId, BeneficiaryStatus};
use serde::Serialize;

use crate::error::ResidentError;

/// Coarse stage of one enrollment, as shown on the tracking view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStage {
    /// Applied; awaiting the program administrator.
    Enrolled,
    /// Accepted; waiting for the resident to confirm payout receipt.
    Approved,
    /// Payout receipt confirmed. Program completed.
    Completed,
    /// Application turned down.
    Rejected,
}

impl TrackingStage {
    pub fn from_record(record: &BeneficiaryRecord) -> Self {
        if record.receipt_validated {
            return Self::Completed;
        }
        match record.status() {
            Some(BeneficiaryStatus::Approved) => Self::Approved,
            Some(BeneficiaryStatus::Rejected) => Self::Rejected,
            Some(BeneficiaryStatus::Pending) | None => Self::Enrolled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

/// Tracking view of one enrollment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BenefitTracking {
    pub id: BeneficiaryId,
    pub program_name: Option<String>,
    pub stage: TrackingStage,
}

impl From<&BeneficiaryRecord> for BenefitTracking {
    fn from(record: &BeneficiaryRecord) -> Self {
        Self {
            id: record.id.clone(),
            program_name: record.program_name.clone(),
            stage: TrackingStage::from_record(record),
        }
    }
}

/// Fetch the resident's enrollments and derive their stages.
pub async fn fetch_tracking(api: &dyn PortalApi) -> Result<Vec<BenefitTracking>, ResidentError> {
    let records = api.fetch_benefits().await?;
    Ok(records.iter().map(BenefitTracking::from).collect())
}
