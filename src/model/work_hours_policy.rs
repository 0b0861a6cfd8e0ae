use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Work-hours configuration scoped to a department, or global when
/// `department_id` is NULL. Read-only to the attendance engine.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkHoursPolicy {
    #[schema(example = 1)]
    pub id: u64,
    /// NULL scopes the policy globally.
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
    pub is_active: bool,
}

impl WorkHoursPolicy {
    /// Hard-coded fallback so attendance recording never blocks on missing
    /// configuration. 8-hour 09:00-17:00 shift, 15-minute grace both sides,
    /// 2 breaks a day capped at 60 minutes each.
    pub fn fallback() -> Self {
        WorkHoursPolicy {
            id: 0,
            department_id: None,
            daily_hours: 8.0,
            shift_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            shift_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            late_grace_minutes: 15,
            early_leave_grace_minutes: 15,
            max_breaks_per_day: 2,
            max_break_duration_minutes: 60,
            overtime_rate: 1.5,
            holiday_overtime_rate: 2.0,
            is_active: true,
        }
    }
}
