use crate::api::manager::{
    ApprovalRequest, CalendarEntry, CalendarQuery, PendingFilter, TeamCalendarResponse,
    TeamMember, TeamStatsResponse,
};
use crate::api::notification::{NotificationFilter, NotificationListResponse};
use crate::api::vacation_request::{
    CreateVacationRequest, RequestFilter, UpdateVacationRequest, VacationRequestListResponse,
    VacationRequestResponse,
};
use crate::model::notification::{Notification, NotificationType};
use crate::model::user::{ManagerSummary, UserResponse};
use crate::model::vacation_request::VacationStatus;
use crate::policy::{EligibilityResult, LeaveRequestDraft, Violation, ViolationKind};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vacation Management API",
        version = "1.0.0",
        description = r#"
## Vacation Management System

This API powers a vacation/leave management system for requesting, approving
and tracking employee time off.

### 🔹 Key Features
- **Vacation Requests**
  - Submit, edit, cancel and track requests with live policy feedback
- **Eligibility Rules**
  - 15-day advance notice, 5-business-day minimum, balance checks — all
    violations reported at once
- **Manager Workflow**
  - Pending queue, approve/reject with comments, team calendar, team stats
- **Notifications**
  - In-app inbox for request, approval and rejection events

### 🔐 Security
Endpoints are protected using **JWT Bearer authentication** with rotating
refresh tokens. Manager endpoints require the **manager** or **admin** role.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::me,

        crate::api::vacation_request::list_requests,
        crate::api::vacation_request::create_request,
        crate::api::vacation_request::validate_request,
        crate::api::vacation_request::get_request,
        crate::api::vacation_request::update_request,
        crate::api::vacation_request::cancel_request,

        crate::api::manager::pending_requests,
        crate::api::manager::approve_request,
        crate::api::manager::reject_request,
        crate::api::manager::team_calendar,
        crate::api::manager::team_stats,

        crate::api::notification::list_notifications,
        crate::api::notification::mark_read,
        crate::api::notification::mark_all_read
    ),
    components(
        schemas(
            LeaveRequestDraft,
            EligibilityResult,
            Violation,
            ViolationKind,
            CreateVacationRequest,
            UpdateVacationRequest,
            RequestFilter,
            VacationRequestResponse,
            VacationRequestListResponse,
            VacationStatus,
            PendingFilter,
            ApprovalRequest,
            CalendarQuery,
            CalendarEntry,
            TeamCalendarResponse,
            TeamMember,
            TeamStatsResponse,
            NotificationFilter,
            Notification,
            NotificationType,
            NotificationListResponse,
            UserResponse,
            ManagerSummary
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication and current user APIs"),
        (name = "VacationRequests", description = "Vacation request APIs"),
        (name = "Manager", description = "Manager approval and team APIs"),
        (name = "Notifications", description = "Notification inbox APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
