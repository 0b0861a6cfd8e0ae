use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Write-once violation record consumed by the external notification
/// dispatcher. Only `is_resolved` changes after insert.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceAlert {
    #[schema(example = 1)]
    pub id: u64,
    /// Correlation id shared with downstream consumers.
    #[schema(example = "8f14e45f-ea4c-4e6d-9f36-1c2d4a68a7b1")]
    pub alert_ref: String,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 7, nullable = true)]
    pub manager_id: Option<u64>,
    /// late_arrival|early_departure|break_exceeded
    #[schema(example = "late_arrival")]
    pub alert_type: String,
    #[schema(example = "Checked in 20 minutes after shift start")]
    pub message: String,
    /// info|warning|critical
    #[schema(example = "warning")]
    pub severity: String,
    pub is_resolved: bool,
    #[schema(example = "2026-01-05T09:20:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}
