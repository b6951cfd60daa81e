use crate::api::notification::notify;
use crate::api::vacation_request::{
    REQUEST_SELECT, VacationRequestListResponse, VacationRequestResponse, fetch_request_by_id,
    internal_error,
};
use crate::auth::auth::AuthUser;
use crate::model::notification::NotificationType;
use crate::model::vacation_request::VacationRequestRow;
use crate::utils::balance_cache;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use sqlx::prelude::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PendingFilter {
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct ApprovalRequest {
    #[schema(example = "Enjoy your vacation")]
    pub comment: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct CalendarQuery {
    #[schema(example = "2026-02-01", format = "date", value_type = Option<String>)]
    /// Range start, defaults to today
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-05-01", format = "date", value_type = Option<String>)]
    /// Range end, defaults to three months from today
    pub end_date: Option<NaiveDate>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct CalendarEntry {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 3)]
    pub user_id: u64,
    #[schema(example = "Joao Santos")]
    pub user_name: String,
    #[schema(example = "2026-02-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-02-13", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = 10)]
    pub business_days: i32,
    pub reason: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TeamCalendarResponse {
    #[schema(example = "2026-02-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-05-01", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub entries: Vec<CalendarEntry>,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct TeamMember {
    #[schema(example = 3)]
    pub id: u64,
    #[schema(example = "Joao Santos")]
    pub name: String,
    #[schema(example = "joao.santos@empresa.com")]
    pub email: String,
    #[schema(example = 22)]
    pub vacation_balance: i32,
    #[schema(example = "Desenvolvimento")]
    pub department: String,
}

#[derive(Serialize, ToSchema)]
pub struct TeamStatsResponse {
    #[schema(example = 3)]
    pub team_members_count: i64,
    #[schema(example = 2)]
    pub pending_requests_count: i64,
    #[schema(example = 5)]
    pub approved_requests_count: i64,
    #[schema(example = 40)]
    pub total_vacation_days: i64,
    #[schema(example = 2026)]
    pub current_year: i32,
    pub team_members: Vec<TeamMember>,
}

/* =========================
Pending requests from direct reports
========================= */
#[utoipa::path(
    get,
    path = "/api/manager/pending-requests",
    params(PendingFilter),
    responses(
        (status = 200, description = "Paginated pending requests, oldest first", body = VacationRequestListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn pending_requests(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PendingFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM vacation_requests vr
        JOIN users u ON u.id = vr.user_id
        WHERE u.manager_id = ? AND vr.status = 'pending'
        "#,
    )
    .bind(auth.user_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(internal_error("Failed to count pending requests"))?;

    let data_sql = format!(
        "{} WHERE u.manager_id = ? AND vr.status = 'pending' \
         ORDER BY vr.created_at ASC LIMIT ? OFFSET ?",
        REQUEST_SELECT
    );
    let rows = sqlx::query_as::<_, VacationRequestRow>(&data_sql)
        .bind(auth.user_id)
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(internal_error("Failed to fetch pending requests"))?;

    let total_pages = ((total as u64 + per_page - 1) / per_page) as u32;

    Ok(HttpResponse::Ok().json(VacationRequestListResponse {
        requests: rows.into_iter().map(Into::into).collect(),
        total,
        page: page as u32,
        per_page: per_page as u32,
        total_pages,
    }))
}

/// Loads the target request and proves the caller manages its owner.
async fn fetch_managed_pending(
    pool: &MySqlPool,
    request_id: u64,
    manager_id: u64,
) -> Result<Option<(u64, i32, NaiveDate, NaiveDate)>, sqlx::Error> {
    sqlx::query_as::<_, (u64, i32, NaiveDate, NaiveDate)>(
        r#"
        SELECT vr.user_id, vr.business_days, vr.start_date, vr.end_date
        FROM vacation_requests vr
        JOIN users u ON u.id = vr.user_id
        WHERE vr.id = ? AND u.manager_id = ? AND vr.status = 'pending'
        "#,
    )
    .bind(request_id)
    .bind(manager_id)
    .fetch_optional(pool)
    .await
}

/* =========================
Approve (manager/admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/vacation-requests/{id}/approve",
    params(
        ("id" = u64, Path, description = "Vacation request id")
    ),
    request_body = ApprovalRequest,
    responses(
        (status = 200, description = "Request approved, balance debited", body = VacationRequestResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Request not found or not managed by the caller")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn approve_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ApprovalRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let request_id = path.into_inner();

    let target = fetch_managed_pending(pool.get_ref(), request_id, auth.user_id)
        .await
        .map_err(internal_error("Failed to fetch vacation request"))?;

    let Some((requester_id, business_days, start_date, end_date)) = target else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Vacation request not found or you don't have permission to approve it"
        })));
    };

    sqlx::query(
        r#"
        UPDATE vacation_requests
        SET status = 'approved', approved_by = ?, approval_date = NOW(), approval_comment = ?
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(auth.user_id)
    .bind(&payload.comment)
    .bind(request_id)
    .execute(pool.get_ref())
    .await
    .map_err(internal_error("Failed to approve vacation request"))?;

    // Debit the stored business-day count, then drop the cached balance
    sqlx::query("UPDATE users SET vacation_balance = vacation_balance - ? WHERE id = ?")
        .bind(business_days)
        .bind(requester_id)
        .execute(pool.get_ref())
        .await
        .map_err(internal_error("Failed to update vacation balance"))?;

    balance_cache::invalidate(requester_id).await;

    notify(
        pool.get_ref(),
        requester_id,
        NotificationType::Approval,
        "Vacation request approved",
        format!(
            "Your vacation from {} to {} was approved",
            start_date, end_date
        ),
    )
    .await;

    let updated = fetch_request_by_id(pool.get_ref(), request_id)
        .await
        .map_err(internal_error("Failed to load approved request"))?;

    match updated {
        Some(row) => Ok(HttpResponse::Ok().json(VacationRequestResponse::from(row))),
        None => Ok(HttpResponse::InternalServerError().finish()),
    }
}

/* =========================
Reject (manager/admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/vacation-requests/{id}/reject",
    params(
        ("id" = u64, Path, description = "Vacation request id")
    ),
    request_body = ApprovalRequest,
    responses(
        (status = 200, description = "Request rejected", body = VacationRequestResponse),
        (status = 400, description = "Comment missing"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Request not found or not managed by the caller")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn reject_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ApprovalRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let request_id = path.into_inner();

    let comment = match payload.comment.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Comment is required for rejection"
            })));
        }
    };

    let target = fetch_managed_pending(pool.get_ref(), request_id, auth.user_id)
        .await
        .map_err(internal_error("Failed to fetch vacation request"))?;

    let Some((requester_id, _, start_date, end_date)) = target else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Vacation request not found or you don't have permission to reject it"
        })));
    };

    sqlx::query(
        r#"
        UPDATE vacation_requests
        SET status = 'rejected', approved_by = ?, approval_date = NOW(), approval_comment = ?
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(auth.user_id)
    .bind(&comment)
    .bind(request_id)
    .execute(pool.get_ref())
    .await
    .map_err(internal_error("Failed to reject vacation request"))?;

    notify(
        pool.get_ref(),
        requester_id,
        NotificationType::Rejection,
        "Vacation request rejected",
        format!(
            "Your vacation from {} to {} was rejected: {}",
            start_date, end_date, comment
        ),
    )
    .await;

    let updated = fetch_request_by_id(pool.get_ref(), request_id)
        .await
        .map_err(internal_error("Failed to load rejected request"))?;

    match updated {
        Some(row) => Ok(HttpResponse::Ok().json(VacationRequestResponse::from(row))),
        None => Ok(HttpResponse::InternalServerError().finish()),
    }
}

/* =========================
Team calendar
========================= */
#[utoipa::path(
    get,
    path = "/api/manager/team-calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Approved team vacations overlapping the range", body = TeamCalendarResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn team_calendar(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<CalendarQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let today = Utc::now().date_naive();
    let range_start = query.start_date.unwrap_or(today);
    let range_end = query
        .end_date
        .or_else(|| today.checked_add_months(Months::new(3)))
        .unwrap_or(today);

    let entries = sqlx::query_as::<_, CalendarEntry>(
        r#"
        SELECT vr.id, vr.user_id, u.name AS user_name, vr.start_date, vr.end_date,
               vr.business_days, vr.reason
        FROM vacation_requests vr
        JOIN users u ON u.id = vr.user_id
        WHERE u.manager_id = ?
          AND vr.status = 'approved'
          AND vr.start_date <= ?
          AND vr.end_date >= ?
        ORDER BY vr.start_date ASC
        "#,
    )
    .bind(auth.user_id)
    .bind(range_end)
    .bind(range_start)
    .fetch_all(pool.get_ref())
    .await
    .map_err(internal_error("Failed to fetch team calendar"))?;

    let total = entries.len();

    Ok(HttpResponse::Ok().json(TeamCalendarResponse {
        start_date: range_start,
        end_date: range_end,
        entries,
        total,
    }))
}

/* =========================
Team statistics
========================= */
#[utoipa::path(
    get,
    path = "/api/manager/team-stats",
    responses(
        (status = 200, description = "Team counts, year totals and member balances", body = TeamStatsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn team_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let team_members_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE manager_id = ? AND active = 1",
    )
    .bind(auth.user_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(internal_error("Failed to count team members"))?;

    let pending_requests_count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM vacation_requests vr
        JOIN users u ON u.id = vr.user_id
        WHERE u.manager_id = ? AND vr.status = 'pending'
        "#,
    )
    .bind(auth.user_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(internal_error("Failed to count pending requests"))?;

    let current_year = Utc::now().year();
    let start_of_year = NaiveDate::from_ymd_opt(current_year, 1, 1).unwrap_or(Utc::now().date_naive());
    let end_of_year = NaiveDate::from_ymd_opt(current_year, 12, 31).unwrap_or(Utc::now().date_naive());

    let approved_requests_count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM vacation_requests vr
        JOIN users u ON u.id = vr.user_id
        WHERE u.manager_id = ? AND vr.status = 'approved'
          AND vr.start_date >= ? AND vr.start_date <= ?
        "#,
    )
    .bind(auth.user_id)
    .bind(start_of_year)
    .bind(end_of_year)
    .fetch_one(pool.get_ref())
    .await
    .map_err(internal_error("Failed to count approved requests"))?;

    let total_vacation_days = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT CAST(COALESCE(SUM(vr.business_days), 0) AS SIGNED)
        FROM vacation_requests vr
        JOIN users u ON u.id = vr.user_id
        WHERE u.manager_id = ? AND vr.status = 'approved'
          AND vr.start_date >= ? AND vr.start_date <= ?
        "#,
    )
    .bind(auth.user_id)
    .bind(start_of_year)
    .bind(end_of_year)
    .fetch_one(pool.get_ref())
    .await
    .map_err(internal_error("Failed to sum approved vacation days"))?;

    let team_members = sqlx::query_as::<_, TeamMember>(
        r#"
        SELECT id, name, email, vacation_balance, department
        FROM users
        WHERE manager_id = ? AND active = 1
        ORDER BY name ASC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(internal_error("Failed to fetch team members"))?;

    Ok(HttpResponse::Ok().json(TeamStatsResponse {
        team_members_count,
        pending_requests_count,
        approved_requests_count,
        total_vacation_days,
        current_year,
        team_members,
    }))
}
