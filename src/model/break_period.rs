use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Child of exactly one AttendanceDay. At most one row per day may have a
/// NULL `break_end` (the currently-open break); closed rows are immutable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BreakPeriod {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub attendance_day_id: u64,
    #[schema(example = "2026-01-05T12:00:00", value_type = String)]
    pub break_start: NaiveDateTime,
    #[schema(example = "2026-01-05T12:45:00", value_type = String, nullable = true)]
    pub break_end: Option<NaiveDateTime>,
    /// Whole minutes, computed when the break closes.
    pub duration_minutes: Option<i64>,
    /// lunch|prayer|coffee|medical
    #[schema(example = "lunch")]
    pub break_type: String,
    pub exceeds_limit: bool,
}
