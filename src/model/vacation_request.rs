use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl VacationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacationStatus::Pending => "pending",
            VacationStatus::Approved => "approved",
            VacationStatus::Rejected => "rejected",
            VacationStatus::Cancelled => "cancelled",
        }
    }
}

/// One `vacation_requests` row joined with the requester's (and, when set,
/// the approver's) name for display.
#[derive(Debug, FromRow)]
pub struct VacationRequestRow {
    pub id: u64,
    pub user_id: u64,
    pub user_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub business_days: i32,
    pub status: String,
    pub reason: Option<String>,
    pub emergency_contact: String,
    pub approved_by: Option<u64>,
    pub approver_name: Option<String>,
    pub approval_date: Option<DateTime<Utc>>,
    pub approval_comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
