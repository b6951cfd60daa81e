use crate::api::vacation_request::internal_error;
use crate::auth::auth::AuthUser;
use crate::model::notification::{Notification, NotificationType};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct NotificationFilter {
    #[schema(example = true)]
    /// Only unread notifications when true
    pub unread: Option<bool>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct NotificationListResponse {
    pub data: Vec<Notification>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
    #[schema(example = 1)]
    pub unread_count: i64,
}

/// Writes a notification row for `user_id`. Best effort: request and
/// approval flows must not fail because the inbox write did.
pub async fn notify(
    pool: &MySqlPool,
    user_id: u64,
    kind: NotificationType,
    title: &str,
    message: String,
) {
    let result = sqlx::query(
        r#"
        INSERT INTO notifications (user_id, kind, title, message)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(title)
    .bind(message)
    .execute(pool)
    .await;

    if let Err(e) = result {
        tracing::error!(error = %e, user_id, "Failed to write notification");
    }
}

/* =========================
List own notifications
========================= */
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationFilter),
    responses(
        (status = 200, description = "Paginated notifications, newest first", body = NotificationListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
pub async fn list_notifications(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<NotificationFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE user_id = ?");
    if query.unread == Some(true) {
        where_sql.push_str(" AND is_read = 0");
    }

    let count_sql = format!("SELECT COUNT(*) FROM notifications{}", where_sql);
    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(auth.user_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(internal_error("Failed to count notifications"))?;

    let unread_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
    )
    .bind(auth.user_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(internal_error("Failed to count unread notifications"))?;

    let data_sql = format!(
        r#"
        SELECT id, user_id, kind, title, message, is_read, read_at, created_at
        FROM notifications
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );
    let data = sqlx::query_as::<_, Notification>(&data_sql)
        .bind(auth.user_id)
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(internal_error("Failed to fetch notifications"))?;

    Ok(HttpResponse::Ok().json(NotificationListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
        unread_count,
    }))
}

/* =========================
Mark one as read
========================= */
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = u64, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = Object, example = json!({
            "message": "Notification marked as read"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
pub async fn mark_read(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let notification_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = 1, read_at = NOW()
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(notification_id)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(internal_error("Failed to mark notification as read"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Notification not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Notification marked as read"
    })))
}

/* =========================
Mark all as read
========================= */
#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All notifications marked as read", body = Object, example = json!({
            "message": "All notifications marked as read",
            "updated": 4
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
pub async fn mark_all_read(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = 1, read_at = NOW()
        WHERE user_id = ? AND is_read = 0
        "#,
    )
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(internal_error("Failed to mark notifications as read"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "All notifications marked as read",
        "updated": result.rows_affected()
    })))
}
