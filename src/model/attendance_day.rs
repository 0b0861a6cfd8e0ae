use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per (employee, date). Created by the first accepted check-in,
/// mutated only through state-machine transitions and the approval workflow.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceDay {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "2026-01-05T09:10:00", value_type = String, nullable = true)]
    pub check_in_time: Option<NaiveDateTime>,
    #[schema(example = "2026-01-05T18:00:00", value_type = String, nullable = true)]
    pub check_out_time: Option<NaiveDateTime>,
    pub check_in_latitude: Option<f64>,
    pub check_in_longitude: Option<f64>,
    pub check_out_latitude: Option<f64>,
    pub check_out_longitude: Option<f64>,
    /// present|absent|late|half_day|leave|holiday|weekend
    #[schema(example = "present")]
    pub status: String,
    pub is_late: bool,
    pub is_early_departure: bool,
    /// Derived at check-out, `work_hours + break_hours`.
    pub total_hours: Option<f64>,
    pub break_hours: Option<f64>,
    pub work_hours: Option<f64>,
    pub overtime_hours: Option<f64>,
    /// pending|approved|rejected
    #[schema(example = "pending")]
    pub approval_status: String,
}
