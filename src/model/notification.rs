use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Request,
    Approval,
    Rejection,
    Reminder,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Request => "request",
            NotificationType::Approval => "approval",
            NotificationType::Rejection => "rejection",
            NotificationType::Reminder => "reminder",
            NotificationType::System => "system",
        }
    }
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Notification {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 3)]
    pub user_id: u64,
    #[serde(rename = "type")]
    #[sqlx(rename = "kind")]
    #[schema(example = "approval")]
    pub kind: String,
    #[schema(example = "Vacation request approved")]
    pub title: String,
    #[schema(example = "Your vacation from 2026-02-02 to 2026-02-13 was approved")]
    pub message: String,
    #[schema(example = false)]
    pub is_read: bool,
    #[schema(example = "2026-01-05T10:00:00Z", format = "date-time", value_type = Option<String>)]
    pub read_at: Option<DateTime<Utc>>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
}
