use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::config::Config;
use crate::core::alert::AlertIntent;
use crate::core::geo::{self, GeoDecision, LocationReport, VerificationMethod};
use crate::core::state::{self, BreakType, TransitionError};
use crate::model::attendance_day::AttendanceDay;
use crate::model::break_period::BreakPeriod;
use crate::model::geofence::GeoFence;
use crate::utils::{employee_filter, policy_cache};

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 24.7136)]
    pub latitude: f64,
    #[schema(example = 46.6753)]
    pub longitude: f64,
    /// Server clock is used when omitted.
    #[schema(example = "2026-01-05T09:10:00", value_type = String, nullable = true)]
    pub timestamp: Option<NaiveDateTime>,
    #[schema(example = "corp-office", nullable = true)]
    pub wifi_ssid: Option<String>,
    #[schema(example = "aa:bb:cc:dd:ee:ff", nullable = true)]
    pub wifi_bssid: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CheckInResponse {
    pub accepted: bool,
    #[schema(example = 42)]
    pub attendance_day_id: u64,
    #[schema(example = "present")]
    pub status: String,
    pub is_late: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckOutRequest {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 24.7136)]
    pub latitude: f64,
    #[schema(example = 46.6753)]
    pub longitude: f64,
    /// Server clock is used when omitted.
    #[schema(example = "2026-01-05T18:00:00", value_type = String, nullable = true)]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Serialize, ToSchema)]
pub struct CheckOutResponse {
    pub accepted: bool,
    #[schema(example = 9.0)]
    pub total_hours: f64,
    #[schema(example = 8.25)]
    pub work_hours: f64,
    #[schema(example = 0.25)]
    pub overtime_hours: f64,
    pub is_early_departure: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct BreakStartRequest {
    #[schema(example = 1000)]
    pub employee_id: u64,
    /// lunch|prayer|coffee|medical
    #[schema(example = "lunch")]
    pub break_type: String,
    #[schema(example = "team lunch", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct BreakEndRequest {
    #[schema(example = 1000)]
    pub employee_id: u64,
}

#[derive(Deserialize, IntoParams)]
pub struct StatusQuery {
    /// Employee to report on
    #[param(example = 1000)]
    pub employee_id: u64,
    /// Defaults to today (server clock)
    #[param(example = "2026-01-05", value_type = String)]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    /// not_checked_in|checked_in|on_break|checked_out
    #[schema(example = "checked_in")]
    pub status: String,
    pub attendance: Option<AttendanceDay>,
    pub current_break: Option<BreakPeriod>,
}

// -------------------- shared plumbing --------------------

#[derive(sqlx::FromRow)]
struct EmployeeCtx {
    id: u64,
    department_id: u64,
    branch_id: u64,
    manager_id: Option<u64>,
}

#[derive(sqlx::FromRow)]
struct BranchCtx {
    verification_method: String,
    geofence_enforced: bool,
}

#[derive(Clone, Copy)]
enum Direction {
    CheckIn,
    CheckOut,
}

fn coordinate_error(latitude: f64, longitude: f64) -> Option<&'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Some("latitude must be within -90..90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Some("longitude must be within -180..180");
    }
    None
}

fn guard_rejection(err: TransitionError) -> HttpResponse {
    HttpResponse::Conflict().json(json!({
        "accepted": false,
        "error": err.kind(),
        "message": err.to_string()
    }))
}

fn unknown_employee(employee_id: u64) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "accepted": false,
        "error": "unknown_employee",
        "message": format!("No employee with id {}", employee_id)
    }))
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> actix_web::Error {
    move |e| {
        tracing::error!(error = %e, context, "Database error");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    }
}

async fn load_employee(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<EmployeeCtx>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeCtx>(
        r#"
        SELECT id, department_id, branch_id, manager_id
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

async fn load_day(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<Option<AttendanceDay>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceDay>(
        r#"
        SELECT id, employee_id, date, check_in_time, check_out_time,
               check_in_latitude, check_in_longitude,
               check_out_latitude, check_out_longitude,
               status, is_late, is_early_departure,
               total_hours, break_hours, work_hours, overtime_hours,
               approval_status
        FROM attendance_days
        WHERE employee_id = ? AND date = ?
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

async fn load_breaks(
    pool: &MySqlPool,
    attendance_day_id: u64,
) -> Result<Vec<BreakPeriod>, sqlx::Error> {
    sqlx::query_as::<_, BreakPeriod>(
        r#"
        SELECT id, attendance_day_id, break_start, break_end,
               duration_minutes, break_type, exceeds_limit
        FROM break_periods
        WHERE attendance_day_id = ?
        ORDER BY break_start
        "#,
    )
    .bind(attendance_day_id)
    .fetch_all(pool)
    .await
}

/// Look up the branch's active fence for the direction and run the pure
/// verifier. Enforcement can be switched off globally or per branch.
async fn verify_location(
    pool: &MySqlPool,
    config: &Config,
    branch_id: u64,
    direction: Direction,
    report: &LocationReport<'_>,
) -> Result<GeoDecision, sqlx::Error> {
    if !config.geofence_enforced {
        return Ok(GeoDecision::Accepted);
    }

    let branch = sqlx::query_as::<_, BranchCtx>(
        r#"
        SELECT verification_method, geofence_enforced
        FROM branches
        WHERE id = ?
        "#,
    )
    .bind(branch_id)
    .fetch_optional(pool)
    .await?;

    let Some(branch) = branch else {
        // Employee points at a branch that no longer exists; same verdict
        // as a branch with no fence so the rejection stays actionable.
        return Ok(geo::verify(None, VerificationMethod::Gps, report));
    };

    if !branch.geofence_enforced {
        return Ok(GeoDecision::Accepted);
    }

    let direction_column = match direction {
        Direction::CheckIn => "is_check_in_location",
        Direction::CheckOut => "is_check_out_location",
    };
    let sql = format!(
        r#"
        SELECT id, branch_id, name, latitude, longitude, radius_m,
               is_check_in_location, is_check_out_location,
               wifi_ssid, wifi_bssid, is_active
        FROM geofences
        WHERE branch_id = ? AND is_active = 1 AND {} = 1
        ORDER BY id
        LIMIT 1
        "#,
        direction_column
    );
    let fence = sqlx::query_as::<_, GeoFence>(&sql)
        .bind(branch_id)
        .fetch_optional(pool)
        .await?;

    let method = VerificationMethod::parse_or_gps(&branch.verification_method);
    Ok(geo::verify(fence.as_ref(), method, report))
}

/// Persist alert intents. Best-effort: a failed insert is logged and
/// swallowed so the attendance transition that raised it still succeeds.
async fn emit_alerts(
    pool: &MySqlPool,
    employee_id: u64,
    manager_id: Option<u64>,
    alerts: &[AlertIntent],
) {
    for alert in alerts {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_alerts
                (alert_ref, employee_id, manager_id, alert_type, message, severity)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(employee_id)
        .bind(manager_id)
        .bind(alert.alert_type.to_string())
        .bind(&alert.message)
        .bind(alert.severity.to_string())
        .execute(pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(
                error = %e,
                employee_id,
                alert_type = %alert.alert_type,
                "Alert insert failed, attendance transition unaffected"
            );
        }
    }
}

// -------------------- handlers --------------------

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in", body = CheckInResponse),
        (status = 400, description = "Invalid coordinates or payload"),
        (status = 403, description = "Location rejected", body = Object, example = json!({
            "accepted": false,
            "error": "location_rejected",
            "message": "outside geofence",
            "distance_m": 150.2
        })),
        (status = 404, description = "Unknown employee"),
        (status = 409, description = "Already checked in today", body = Object, example = json!({
            "accepted": false,
            "error": "duplicate_check_in",
            "message": "already checked in today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    let req = payload.into_inner();

    // 1) field-level validation before touching any state
    if let Some(detail) = coordinate_error(req.latitude, req.longitude) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "accepted": false,
            "error": "invalid_coordinates",
            "message": detail
        })));
    }

    // 2) unknown ids short-circuit on the prefilter, no DB round trip
    if !employee_filter::might_exist(req.employee_id) {
        return Ok(unknown_employee(req.employee_id));
    }
    let employee = load_employee(pool.get_ref(), req.employee_id)
        .await
        .map_err(db_error("check-in employee lookup"))?;
    let Some(employee) = employee else {
        return Ok(unknown_employee(req.employee_id));
    };

    let now = req.timestamp.unwrap_or_else(|| Utc::now().naive_utc());
    let date = now.date();

    // 3) physical verification
    let report = LocationReport {
        latitude: req.latitude,
        longitude: req.longitude,
        wifi_ssid: req.wifi_ssid.as_deref(),
        wifi_bssid: req.wifi_bssid.as_deref(),
    };
    let decision = verify_location(
        pool.get_ref(),
        &config,
        employee.branch_id,
        Direction::CheckIn,
        &report,
    )
    .await
    .map_err(db_error("check-in geofence lookup"))?;

    if let GeoDecision::Rejected { reason, distance_m } = decision {
        tracing::info!(employee_id = req.employee_id, reason = %reason, "Check-in location rejected");
        return Ok(HttpResponse::Forbidden().json(json!({
            "accepted": false,
            "error": "location_rejected",
            "message": reason,
            "distance_m": distance_m
        })));
    }

    // 4) evaluate the transition against the resolved policy
    let policy = policy_cache::resolve_for_department(pool.get_ref(), employee.department_id).await;
    let existing = load_day(pool.get_ref(), req.employee_id, date)
        .await
        .map_err(db_error("check-in day lookup"))?;

    let outcome = match state::apply_check_in(
        existing.as_ref(),
        req.employee_id,
        date,
        now,
        req.latitude,
        req.longitude,
        &policy,
    ) {
        Ok(outcome) => outcome,
        Err(e) => return Ok(guard_rejection(e)),
    };

    // 5) persist; the unique key on (employee_id, date) backstops races
    let attendance_day_id = match &existing {
        Some(marker) => {
            let affected = sqlx::query(
                r#"
                UPDATE attendance_days
                SET check_in_time = ?, check_in_latitude = ?, check_in_longitude = ?,
                    status = ?, is_late = ?
                WHERE id = ? AND check_in_time IS NULL
                "#,
            )
            .bind(now)
            .bind(req.latitude)
            .bind(req.longitude)
            .bind(&outcome.day.status)
            .bind(outcome.day.is_late)
            .bind(marker.id)
            .execute(pool.get_ref())
            .await
            .map_err(db_error("check-in marker update"))?
            .rows_affected();

            if affected == 0 {
                // Lost the race: someone filled the marker row first.
                return Ok(guard_rejection(TransitionError::DuplicateCheckIn));
            }
            marker.id
        }
        None => {
            let result = sqlx::query(
                r#"
                INSERT INTO attendance_days
                    (employee_id, date, check_in_time,
                     check_in_latitude, check_in_longitude, status, is_late)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(req.employee_id)
            .bind(date)
            .bind(now)
            .bind(req.latitude)
            .bind(req.longitude)
            .bind(&outcome.day.status)
            .bind(outcome.day.is_late)
            .execute(pool.get_ref())
            .await;

            match result {
                Ok(r) => r.last_insert_id(),
                Err(e) => {
                    // Duplicate check-in for the same day
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.code().as_deref() == Some("23000") {
                            return Ok(guard_rejection(TransitionError::DuplicateCheckIn));
                        }
                    }
                    tracing::error!(error = %e, employee_id = req.employee_id, "Check-in failed");
                    return Err(actix_web::error::ErrorInternalServerError(
                        "Internal Server Error",
                    ));
                }
            }
        }
    };

    emit_alerts(pool.get_ref(), employee.id, employee.manager_id, &outcome.alerts).await;

    Ok(HttpResponse::Ok().json(CheckInResponse {
        accepted: true,
        attendance_day_id,
        status: outcome.day.status,
        is_late: outcome.day.is_late,
    }))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/check-out",
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Checked out", body = CheckOutResponse),
        (status = 400, description = "Invalid coordinates or timestamp"),
        (status = 403, description = "Location rejected"),
        (status = 404, description = "Unknown employee"),
        (status = 409, description = "No active check-in, open break, or already checked out"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CheckOutRequest>,
) -> actix_web::Result<impl Responder> {
    let req = payload.into_inner();

    if let Some(detail) = coordinate_error(req.latitude, req.longitude) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "accepted": false,
            "error": "invalid_coordinates",
            "message": detail
        })));
    }

    if !employee_filter::might_exist(req.employee_id) {
        return Ok(unknown_employee(req.employee_id));
    }
    let employee = load_employee(pool.get_ref(), req.employee_id)
        .await
        .map_err(db_error("check-out employee lookup"))?;
    let Some(employee) = employee else {
        return Ok(unknown_employee(req.employee_id));
    };

    let now = req.timestamp.unwrap_or_else(|| Utc::now().naive_utc());
    let date = now.date();

    let report = LocationReport {
        latitude: req.latitude,
        longitude: req.longitude,
        wifi_ssid: None,
        wifi_bssid: None,
    };
    let decision = verify_location(
        pool.get_ref(),
        &config,
        employee.branch_id,
        Direction::CheckOut,
        &report,
    )
    .await
    .map_err(db_error("check-out geofence lookup"))?;

    if let GeoDecision::Rejected { reason, distance_m } = decision {
        tracing::info!(employee_id = req.employee_id, reason = %reason, "Check-out location rejected");
        return Ok(HttpResponse::Forbidden().json(json!({
            "accepted": false,
            "error": "location_rejected",
            "message": reason,
            "distance_m": distance_m
        })));
    }

    let day = load_day(pool.get_ref(), req.employee_id, date)
        .await
        .map_err(db_error("check-out day lookup"))?;
    let Some(day) = day else {
        return Ok(guard_rejection(TransitionError::NoActiveCheckIn));
    };

    if let Some(check_in_time) = day.check_in_time {
        if now < check_in_time {
            return Ok(HttpResponse::BadRequest().json(json!({
                "accepted": false,
                "error": "invalid_timestamp",
                "message": "check-out cannot precede check-in"
            })));
        }
    }

    let breaks = load_breaks(pool.get_ref(), day.id)
        .await
        .map_err(db_error("check-out break lookup"))?;
    let policy = policy_cache::resolve_for_department(pool.get_ref(), employee.department_id).await;

    let outcome =
        match state::apply_check_out(&day, &breaks, now, req.latitude, req.longitude, &policy) {
            Ok(outcome) => outcome,
            Err(e) => return Ok(guard_rejection(e)),
        };

    let affected = sqlx::query(
        r#"
        UPDATE attendance_days
        SET check_out_time = ?, check_out_latitude = ?, check_out_longitude = ?,
            is_early_departure = ?,
            total_hours = ?, break_hours = ?, work_hours = ?, overtime_hours = ?
        WHERE id = ? AND check_out_time IS NULL
        "#,
    )
    .bind(now)
    .bind(req.latitude)
    .bind(req.longitude)
    .bind(outcome.day.is_early_departure)
    .bind(outcome.hours.total_hours)
    .bind(outcome.hours.break_hours)
    .bind(outcome.hours.work_hours)
    .bind(outcome.hours.overtime_hours)
    .bind(day.id)
    .execute(pool.get_ref())
    .await
    .map_err(db_error("check-out update"))?
    .rows_affected();

    if affected == 0 {
        // Lost the race to another check-out for the same day.
        return Ok(guard_rejection(TransitionError::AlreadyCheckedOut));
    }

    emit_alerts(pool.get_ref(), employee.id, employee.manager_id, &outcome.alerts).await;

    Ok(HttpResponse::Ok().json(CheckOutResponse {
        accepted: true,
        total_hours: outcome.hours.total_hours,
        work_hours: outcome.hours.work_hours,
        overtime_hours: outcome.hours.overtime_hours,
        is_early_departure: outcome.day.is_early_departure,
    }))
}

/// Break-start endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/break/start",
    request_body = BreakStartRequest,
    responses(
        (status = 200, description = "Break opened", body = Object, example = json!({
            "break_id": 7
        })),
        (status = 400, description = "Unknown break type"),
        (status = 404, description = "Unknown employee"),
        (status = 409, description = "Not checked in, break already open, or limit reached"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn break_start(
    pool: web::Data<MySqlPool>,
    payload: web::Json<BreakStartRequest>,
) -> actix_web::Result<impl Responder> {
    let req = payload.into_inner();

    let Ok(break_type) = BreakType::from_str(&req.break_type) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "invalid_break_type",
            "message": "Allowed: lunch, prayer, coffee, medical"
        })));
    };

    if !employee_filter::might_exist(req.employee_id) {
        return Ok(unknown_employee(req.employee_id));
    }
    let employee = load_employee(pool.get_ref(), req.employee_id)
        .await
        .map_err(db_error("break-start employee lookup"))?;
    let Some(employee) = employee else {
        return Ok(unknown_employee(req.employee_id));
    };

    let now = Utc::now().naive_utc();
    let day = load_day(pool.get_ref(), req.employee_id, now.date())
        .await
        .map_err(db_error("break-start day lookup"))?;
    let Some(day) = day else {
        return Ok(guard_rejection(TransitionError::NoActiveCheckIn));
    };

    let breaks = load_breaks(pool.get_ref(), day.id)
        .await
        .map_err(db_error("break-start break lookup"))?;
    let policy = policy_cache::resolve_for_department(pool.get_ref(), employee.department_id).await;

    let open = match state::apply_break_start(&day, &breaks, now, break_type, &policy) {
        Ok(open) => open,
        Err(e) => return Ok(guard_rejection(e)),
    };

    if let Some(reason) = req.reason.as_deref() {
        tracing::debug!(employee_id = req.employee_id, reason, "Break reason supplied");
    }

    // Guarded insert keeps "one open break per day" true under races.
    let result = sqlx::query(
        r#"
        INSERT INTO break_periods (attendance_day_id, break_start, break_type)
        SELECT ?, ?, ?
        FROM DUAL
        WHERE NOT EXISTS (
            SELECT 1 FROM break_periods
            WHERE attendance_day_id = ? AND break_end IS NULL
        )
        "#,
    )
    .bind(open.attendance_day_id)
    .bind(open.break_start)
    .bind(&open.break_type)
    .bind(open.attendance_day_id)
    .execute(pool.get_ref())
    .await
    .map_err(db_error("break-start insert"))?;

    if result.rows_affected() == 0 {
        return Ok(guard_rejection(TransitionError::BreakAlreadyOpen));
    }

    Ok(HttpResponse::Ok().json(json!({
        "break_id": result.last_insert_id()
    })))
}

/// Break-end endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/break/end",
    request_body = BreakEndRequest,
    responses(
        (status = 200, description = "Break closed", body = Object, example = json!({
            "break_id": 7,
            "duration_minutes": 45,
            "exceeds_limit": false
        })),
        (status = 404, description = "Unknown employee"),
        (status = 409, description = "No open break"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn break_end(
    pool: web::Data<MySqlPool>,
    payload: web::Json<BreakEndRequest>,
) -> actix_web::Result<impl Responder> {
    let req = payload.into_inner();

    if !employee_filter::might_exist(req.employee_id) {
        return Ok(unknown_employee(req.employee_id));
    }
    let employee = load_employee(pool.get_ref(), req.employee_id)
        .await
        .map_err(db_error("break-end employee lookup"))?;
    let Some(employee) = employee else {
        return Ok(unknown_employee(req.employee_id));
    };

    let now = Utc::now().naive_utc();
    let day = load_day(pool.get_ref(), req.employee_id, now.date())
        .await
        .map_err(db_error("break-end day lookup"))?;
    let Some(day) = day else {
        return Ok(guard_rejection(TransitionError::NoActiveCheckIn));
    };

    let breaks = load_breaks(pool.get_ref(), day.id)
        .await
        .map_err(db_error("break-end break lookup"))?;
    let policy = policy_cache::resolve_for_department(pool.get_ref(), employee.department_id).await;

    let outcome = match state::apply_break_end(&day, &breaks, now, &policy) {
        Ok(outcome) => outcome,
        Err(e) => return Ok(guard_rejection(e)),
    };
    let closed = &outcome.break_period;

    let affected = sqlx::query(
        r#"
        UPDATE break_periods
        SET break_end = ?, duration_minutes = ?, exceeds_limit = ?
        WHERE id = ? AND break_end IS NULL
        "#,
    )
    .bind(closed.break_end)
    .bind(closed.duration_minutes)
    .bind(closed.exceeds_limit)
    .bind(closed.id)
    .execute(pool.get_ref())
    .await
    .map_err(db_error("break-end update"))?
    .rows_affected();

    if affected == 0 {
        // Lost the race to a concurrent break-end.
        return Ok(guard_rejection(TransitionError::NoOpenBreak));
    }

    emit_alerts(pool.get_ref(), employee.id, employee.manager_id, &outcome.alerts).await;

    Ok(HttpResponse::Ok().json(json!({
        "break_id": closed.id,
        "duration_minutes": closed.duration_minutes,
        "exceeds_limit": closed.exceeds_limit
    })))
}

/// Current-status endpoint, pure query
#[utoipa::path(
    get,
    path = "/api/v1/attendance/status",
    params(StatusQuery),
    responses(
        (status = 200, description = "Current state for the day", body = StatusResponse),
        (status = 404, description = "Unknown employee"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn current_status(
    pool: web::Data<MySqlPool>,
    query: web::Query<StatusQuery>,
) -> actix_web::Result<impl Responder> {
    if !employee_filter::might_exist(query.employee_id) {
        return Ok(unknown_employee(query.employee_id));
    }
    let employee = load_employee(pool.get_ref(), query.employee_id)
        .await
        .map_err(db_error("status employee lookup"))?;
    if employee.is_none() {
        return Ok(unknown_employee(query.employee_id));
    }

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let day = load_day(pool.get_ref(), query.employee_id, date)
        .await
        .map_err(db_error("status day lookup"))?;

    let breaks = match &day {
        Some(day) => load_breaks(pool.get_ref(), day.id)
            .await
            .map_err(db_error("status break lookup"))?,
        None => Vec::new(),
    };

    let status = state::day_state(day.as_ref(), &breaks);
    let current_break = breaks.into_iter().find(|b| b.break_end.is_none());

    Ok(HttpResponse::Ok().json(StatusResponse {
        status: status.to_string(),
        attendance: day,
        current_break,
    }))
}
