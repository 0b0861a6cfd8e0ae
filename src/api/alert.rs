use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::model::attendance_alert::AttendanceAlert;

#[derive(serde::Deserialize, IntoParams, ToSchema)]
pub struct AlertFilter {
    #[schema(example = 1000)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "late_arrival")]
    /// Filter by alert type
    pub alert_type: Option<String>,
    #[schema(example = false)]
    /// Filter by resolution state
    pub is_resolved: Option<bool>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
    Bool(bool),
}

#[derive(Serialize, ToSchema)]
pub struct AlertListResponse {
    pub data: Vec<AttendanceAlert>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/* =========================
Alert feed for the dispatcher
========================= */
/// List alerts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    params(AlertFilter),
    responses(
        (status = 200, description = "Paginated alert list", body = AlertListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Alert"
)]
pub async fn alert_list(
    pool: web::Data<MySqlPool>,
    query: web::Query<AlertFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(employee_id));
    }

    if let Some(alert_type) = query.alert_type.as_deref() {
        where_sql.push_str(" AND alert_type = ?");
        args.push(FilterValue::Str(alert_type));
    }

    if let Some(is_resolved) = query.is_resolved {
        where_sql.push_str(" AND is_resolved = ?");
        args.push(FilterValue::Bool(is_resolved));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM attendance_alerts{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
            FilterValue::Bool(b) => count_q.bind(*b),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count alerts");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, alert_ref, employee_id, manager_id, alert_type,
               message, severity, is_resolved, created_at
        FROM attendance_alerts
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceAlert>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
            FilterValue::Bool(b) => data_q.bind(b),
        };
    }

    let alerts = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch alert list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(AlertListResponse {
        data: alerts,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/* =========================
Resolve alert (external workflow)
========================= */
/// Mark an alert resolved
#[utoipa::path(
    put,
    path = "/api/v1/alerts/{alert_id}/resolve",
    params(
        ("alert_id" = u64, Path, description = "ID of the alert to resolve")
    ),
    responses(
        (status = 200, description = "Alert resolved", body = Object, example = json!({
            "message": "Alert resolved"
        })),
        (status = 400, description = "Alert not found or already resolved", body = Object, example = json!({
            "message": "Alert not found or already resolved"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Alert"
)]
pub async fn resolve_alert(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let alert_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE attendance_alerts
        SET is_resolved = 1
        WHERE id = ?
        AND is_resolved = 0
        "#,
    )
    .bind(alert_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, alert_id, "Resolve alert failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Alert not found or already resolved"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Alert resolved"
    })))
}
