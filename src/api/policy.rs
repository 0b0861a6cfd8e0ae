use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::model::work_hours_policy::WorkHoursPolicy;
use crate::utils::db_utils::{build_update_sql, execute_update};
use crate::utils::policy_cache;

#[derive(Deserialize, ToSchema)]
pub struct CreatePolicy {
    /// Omit to create a global policy.
    #[schema(example = 10, nullable = true)]
    pub department_id: Option<u64>,
    #[schema(example = 8.0)]
    pub daily_hours: f64,
    #[schema(example = "09:00:00", value_type = String)]
    pub shift_start: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub shift_end: NaiveTime,
    #[schema(example = 15)]
    pub late_grace_minutes: u32,
    #[schema(example = 15)]
    pub early_leave_grace_minutes: u32,
    #[schema(example = 2)]
    pub max_breaks_per_day: u32,
    #[schema(example = 60)]
    pub max_break_duration_minutes: u32,
    #[schema(example = 1.5)]
    pub overtime_rate: f64,
    #[schema(example = 2.0)]
    pub holiday_overtime_rate: f64,
}

const UPDATABLE_COLUMNS: &[&str] = &[
    "department_id",
    "daily_hours",
    "shift_start",
    "shift_end",
    "late_grace_minutes",
    "early_leave_grace_minutes",
    "max_breaks_per_day",
    "max_break_duration_minutes",
    "overtime_rate",
    "holiday_overtime_rate",
    "is_active",
];

/// List work-hours policies
#[utoipa::path(
    get,
    path = "/api/v1/policies",
    responses(
        (status = 200, description = "All policies, active and inactive", body = [WorkHoursPolicy]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Policy"
)]
pub async fn list_policies(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let policies = sqlx::query_as::<_, WorkHoursPolicy>(
        r#"
        SELECT id, department_id, daily_hours, shift_start, shift_end,
               late_grace_minutes, early_leave_grace_minutes,
               max_breaks_per_day, max_break_duration_minutes,
               overtime_rate, holiday_overtime_rate, is_active
        FROM work_hours_policies
        ORDER BY id
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to list policies");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(policies))
}

/// Create a work-hours policy
#[utoipa::path(
    post,
    path = "/api/v1/policies",
    request_body = CreatePolicy,
    responses(
        (status = 201, description = "Policy created"),
        (status = 400, description = "Invalid policy values"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Policy"
)]
pub async fn create_policy(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePolicy>,
) -> actix_web::Result<impl Responder> {
    if payload.daily_hours <= 0.0 || payload.daily_hours > 24.0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "daily_hours must be within (0, 24]"
        })));
    }
    if payload.shift_end <= payload.shift_start {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "shift_end must be after shift_start"
        })));
    }
    if payload.max_breaks_per_day == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "max_breaks_per_day must be at least 1"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO work_hours_policies
            (department_id, daily_hours, shift_start, shift_end,
             late_grace_minutes, early_leave_grace_minutes,
             max_breaks_per_day, max_break_duration_minutes,
             overtime_rate, holiday_overtime_rate, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
        "#,
    )
    .bind(payload.department_id)
    .bind(payload.daily_hours)
    .bind(payload.shift_start)
    .bind(payload.shift_end)
    .bind(payload.late_grace_minutes)
    .bind(payload.early_leave_grace_minutes)
    .bind(payload.max_breaks_per_day)
    .bind(payload.max_break_duration_minutes)
    .bind(payload.overtime_rate)
    .bind(payload.holiday_overtime_rate)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to create policy");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // Resolutions may change for every department this policy covers.
    policy_cache::invalidate_all();

    Ok(HttpResponse::Created().json(json!({
        "message": "Policy created",
        "policy_id": result.last_insert_id()
    })))
}

/// Update a work-hours policy
#[utoipa::path(
    put,
    path = "/api/v1/policies/{policy_id}",
    params(
        ("policy_id" = u64, Path, description = "Policy ID")
    ),
    responses(
        (status = 200, description = "Policy updated"),
        (status = 400, description = "Unknown field or empty payload"),
        (status = 404, description = "Policy not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Policy"
)]
pub async fn update_policy(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let policy_id = path.into_inner();

    let update = build_update_sql(
        "work_hours_policies",
        &body,
        UPDATABLE_COLUMNS,
        "id",
        policy_id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Policy not found"
        })));
    }

    policy_cache::invalidate_all();

    Ok(HttpResponse::Ok().json(json!({
        "message": "Policy updated"
    })))
}
