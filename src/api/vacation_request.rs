use crate::auth::auth::AuthUser;
use crate::api::notification::notify;
use crate::model::notification::NotificationType;
use crate::model::vacation_request::{VacationRequestRow, VacationStatus};
use crate::policy::{self, EligibilityResult, LeaveRequestDraft};
use crate::utils::balance_cache;
use crate::utils::sql::{SqlValue, UpdateBuilder};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

/// Joined SELECT used by every handler that returns full request payloads.
pub(crate) const REQUEST_SELECT: &str = r#"
    SELECT vr.id, vr.user_id, u.name AS user_name, vr.start_date, vr.end_date,
           vr.business_days, vr.status, vr.reason, vr.emergency_contact,
           vr.approved_by, a.name AS approver_name, vr.approval_date,
           vr.approval_comment, vr.created_at, vr.updated_at
    FROM vacation_requests vr
    JOIN users u ON u.id = vr.user_id
    LEFT JOIN users a ON a.id = vr.approved_by
"#;

#[derive(Deserialize, ToSchema)]
pub struct CreateVacationRequest {
    #[schema(example = "2026-02-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-02-13", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub reason: Option<String>,
    #[schema(example = "Ana +55 11 99999-0000")]
    pub emergency_contact: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateVacationRequest {
    #[schema(example = "2026-02-03", format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-02-14", format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub emergency_contact: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RequestFilter {
    #[schema(example = "pending")]
    /// Filter by request status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct VacationRequestResponse {
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
    #[schema(example = "pending")]
    pub status: String,
    pub reason: Option<String>,
    #[schema(example = "Ana +55 11 99999-0000")]
    pub emergency_contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time", value_type = Option<String>)]
    pub approval_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_comment: Option<String>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<VacationRequestRow> for VacationRequestResponse {
    fn from(row: VacationRequestRow) -> Self {
        VacationRequestResponse {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            start_date: row.start_date,
            end_date: row.end_date,
            business_days: row.business_days,
            status: row.status,
            reason: row.reason,
            emergency_contact: row.emergency_contact,
            approved_by: row.approved_by,
            approver_name: row.approver_name,
            approval_date: row.approval_date,
            approval_comment: row.approval_comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct VacationRequestListResponse {
    pub requests: Vec<VacationRequestResponse>,
    #[schema(example = 1)]
    pub total: i64,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total_pages: u32,
}

pub(crate) fn internal_error(context: &str) -> impl Fn(sqlx::Error) -> actix_web::Error + '_ {
    move |e: sqlx::Error| {
        tracing::error!(error = %e, "{}", context);
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    }
}

pub(crate) async fn fetch_request_by_id(
    pool: &MySqlPool,
    id: u64,
) -> Result<Option<VacationRequestRow>, sqlx::Error> {
    let sql = format!("{} WHERE vr.id = ?", REQUEST_SELECT);
    sqlx::query_as::<_, VacationRequestRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/* =========================
List own vacation requests
========================= */
#[utoipa::path(
    get,
    path = "/api/vacation-requests",
    params(RequestFilter),
    responses(
        (status = 200, description = "Paginated list of the caller's requests", body = VacationRequestListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "VacationRequests"
)]
pub async fn list_requests(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RequestFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE vr.user_id = ?");
    if query.status.is_some() {
        where_sql.push_str(" AND vr.status = ?");
    }

    let count_sql = format!(
        "SELECT COUNT(*) FROM vacation_requests vr{}",
        where_sql
    );
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql).bind(auth.user_id);
    if let Some(status) = query.status.as_deref() {
        count_q = count_q.bind(status);
    }

    let total = count_q
        .fetch_one(pool.get_ref())
        .await
        .map_err(internal_error("Failed to count vacation requests"))?;

    let data_sql = format!(
        "{}{} ORDER BY vr.created_at DESC LIMIT ? OFFSET ?",
        REQUEST_SELECT, where_sql
    );
    let mut data_q = sqlx::query_as::<_, VacationRequestRow>(&data_sql).bind(auth.user_id);
    if let Some(status) = query.status.as_deref() {
        data_q = data_q.bind(status);
    }

    let rows = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(internal_error("Failed to fetch vacation requests"))?;

    let total_pages = ((total as u64 + per_page - 1) / per_page) as u32;

    Ok(HttpResponse::Ok().json(VacationRequestListResponse {
        requests: rows.into_iter().map(Into::into).collect(),
        total,
        page: page as u32,
        per_page: per_page as u32,
        total_pages,
    }))
}

/* =========================
Create vacation request
========================= */
#[utoipa::path(
    post,
    path = "/api/vacation-requests",
    request_body(
        content = CreateVacationRequest,
        description = "Vacation request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Request created", body = VacationRequestResponse),
        (status = 400, description = "Policy violations or overlapping request", body = Object, example = json!({
            "error": "Request violates vacation policy",
            "business_days": 3,
            "violations": [
                {"kind": "DURATION_TOO_SHORT", "field": "end_date", "message": "Minimum vacation period is 5 business days"}
            ]
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "VacationRequests"
)]
pub async fn create_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateVacationRequest>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let balance = balance_cache::get_balance(pool.get_ref(), auth.user_id)
        .await
        .map_err(internal_error("Failed to fetch vacation balance"))?;
    let Some(balance) = balance else {
        return Ok(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "User not found or inactive"
        })));
    };

    let draft = LeaveRequestDraft {
        start_date: Some(payload.start_date),
        end_date: Some(payload.end_date),
        reason: payload.reason.clone(),
        emergency_contact: payload.emergency_contact.clone(),
    };

    // Authoritative policy check; every violation is reported at once
    let today = Utc::now().date_naive();
    let eligibility = policy::evaluate(&draft, today, balance);
    if !eligibility.is_admissible() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Request violates vacation policy",
            "business_days": eligibility.business_days,
            "violations": eligibility.violations
        })));
    }

    // Overlap against the caller's own open requests stays a storage concern
    let overlapping = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM vacation_requests
        WHERE user_id = ?
          AND status IN ('pending', 'approved')
          AND start_date <= ?
          AND end_date >= ?
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.end_date)
    .bind(payload.start_date)
    .fetch_one(pool.get_ref())
    .await
    .map_err(internal_error("Failed to check for overlapping requests"))?;

    if overlapping > 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "You have overlapping vacation requests"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO vacation_requests
            (user_id, start_date, end_date, business_days, status, reason, emergency_contact)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(eligibility.business_days as i32)
    .bind(VacationStatus::Pending.as_str())
    .bind(&payload.reason)
    .bind(&payload.emergency_contact)
    .execute(pool.get_ref())
    .await
    .map_err(internal_error("Failed to create vacation request"))?;

    let request_id = result.last_insert_id();

    // Tell the requester's manager; failure here never fails the request
    let requester = sqlx::query_as::<_, (String, Option<u64>)>(
        "SELECT name, manager_id FROM users WHERE id = ?",
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(internal_error("Failed to fetch requester"))?;

    if let Some((name, Some(manager_id))) = requester {
        notify(
            pool.get_ref(),
            manager_id,
            NotificationType::Request,
            "New vacation request",
            format!(
                "{} requested vacation from {} to {}",
                name, payload.start_date, payload.end_date
            ),
        )
        .await;
    }

    let created = fetch_request_by_id(pool.get_ref(), request_id)
        .await
        .map_err(internal_error("Failed to load created request"))?;

    match created {
        Some(row) => Ok(HttpResponse::Created().json(VacationRequestResponse::from(row))),
        None => Ok(HttpResponse::InternalServerError().finish()),
    }
}

/* =========================
Live eligibility feedback
========================= */
/// Evaluates a draft without creating anything; the request form calls this
/// on every date change and shows the returned violations inline.
#[utoipa::path(
    post,
    path = "/api/vacation-requests/validate",
    request_body(
        content = LeaveRequestDraft,
        description = "Draft to evaluate, possibly half-filled",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Eligibility result, violations included", body = EligibilityResult),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "VacationRequests"
)]
pub async fn validate_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<LeaveRequestDraft>,
) -> actix_web::Result<impl Responder> {
    let balance = balance_cache::get_balance(pool.get_ref(), auth.user_id)
        .await
        .map_err(internal_error("Failed to fetch vacation balance"))?
        .unwrap_or(0);

    let today = Utc::now().date_naive();
    Ok(HttpResponse::Ok().json(policy::evaluate(&payload, today, balance)))
}

/* =========================
Get one request
========================= */
#[utoipa::path(
    get,
    path = "/api/vacation-requests/{id}",
    params(
        ("id" = u64, Path, description = "Vacation request id")
    ),
    responses(
        (status = 200, description = "Vacation request found", body = VacationRequestResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Vacation request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "VacationRequests"
)]
pub async fn get_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let sql = format!("{} WHERE vr.id = ? AND vr.user_id = ?", REQUEST_SELECT);
    let row = sqlx::query_as::<_, VacationRequestRow>(&sql)
        .bind(request_id)
        .bind(auth.user_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(internal_error("Failed to fetch vacation request"))?;

    match row {
        Some(row) => Ok(HttpResponse::Ok().json(VacationRequestResponse::from(row))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Vacation request not found"
        }))),
    }
}

/* =========================
Update a pending request
========================= */
#[utoipa::path(
    put,
    path = "/api/vacation-requests/{id}",
    params(
        ("id" = u64, Path, description = "Vacation request id")
    ),
    request_body = UpdateVacationRequest,
    responses(
        (status = 200, description = "Request updated", body = VacationRequestResponse),
        (status = 400, description = "Not pending, or the merged draft violates policy"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Vacation request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "VacationRequests"
)]
pub async fn update_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateVacationRequest>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();
    let payload = payload.into_inner();

    let existing = sqlx::query_as::<_, (NaiveDate, NaiveDate, Option<String>, String, String)>(
        r#"
        SELECT start_date, end_date, reason, emergency_contact, status
        FROM vacation_requests
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(request_id)
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(internal_error("Failed to fetch vacation request"))?;

    let Some((start, end, reason, contact, status)) = existing else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Vacation request not found"
        })));
    };

    if status != VacationStatus::Pending.as_str() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Only pending requests can be updated"
        })));
    }

    // Merge and put the edited draft through the same policy as a new one
    let draft = LeaveRequestDraft {
        start_date: Some(payload.start_date.unwrap_or(start)),
        end_date: Some(payload.end_date.unwrap_or(end)),
        reason: payload.reason.clone().or(reason),
        emergency_contact: payload
            .emergency_contact
            .clone()
            .unwrap_or(contact),
    };

    let balance = balance_cache::get_balance(pool.get_ref(), auth.user_id)
        .await
        .map_err(internal_error("Failed to fetch vacation balance"))?
        .unwrap_or(0);

    let today = Utc::now().date_naive();
    let eligibility = policy::evaluate(&draft, today, balance);
    if !eligibility.is_admissible() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Request violates vacation policy",
            "business_days": eligibility.business_days,
            "violations": eligibility.violations
        })));
    }

    let update = UpdateBuilder::new("vacation_requests")
        .set_opt("start_date", payload.start_date.map(SqlValue::Date))
        .set_opt("end_date", payload.end_date.map(SqlValue::Date))
        .set_opt("reason", payload.reason.map(SqlValue::Str))
        .set_opt(
            "emergency_contact",
            payload.emergency_contact.map(SqlValue::Str),
        )
        .set(
            "business_days",
            SqlValue::I64(eligibility.business_days as i64),
        );

    update
        .execute_by_id(pool.get_ref(), request_id)
        .await
        .map_err(internal_error("Failed to update vacation request"))?;

    let updated = fetch_request_by_id(pool.get_ref(), request_id)
        .await
        .map_err(internal_error("Failed to load updated request"))?;

    match updated {
        Some(row) => Ok(HttpResponse::Ok().json(VacationRequestResponse::from(row))),
        None => Ok(HttpResponse::InternalServerError().finish()),
    }
}

/* =========================
Cancel a pending request
========================= */
#[utoipa::path(
    delete,
    path = "/api/vacation-requests/{id}",
    params(
        ("id" = u64, Path, description = "Vacation request id")
    ),
    responses(
        (status = 200, description = "Request cancelled", body = Object, example = json!({
            "message": "Vacation request cancelled successfully"
        })),
        (status = 400, description = "Request not found or already processed"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "VacationRequests"
)]
pub async fn cancel_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    // Cancelled, never deleted; history keeps the row
    let result = sqlx::query(
        r#"
        UPDATE vacation_requests
        SET status = 'cancelled'
        WHERE id = ? AND user_id = ? AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(internal_error("Failed to cancel vacation request"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Vacation request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Vacation request cancelled successfully"
    })))
}
