use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AlertType {
    LateArrival,
    EarlyDeparture,
    BreakExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// A policy violation the state machine wants recorded. Persisting it is
/// best-effort telemetry: failure must never roll back the attendance
/// transition that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertIntent {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
}

impl AlertIntent {
    pub fn late_arrival(minutes_late: i64) -> Self {
        AlertIntent {
            alert_type: AlertType::LateArrival,
            severity: AlertSeverity::Warning,
            message: format!("Checked in {} minutes after shift start", minutes_late),
        }
    }

    pub fn early_departure(minutes_early: i64) -> Self {
        AlertIntent {
            alert_type: AlertType::EarlyDeparture,
            severity: AlertSeverity::Warning,
            message: format!("Checked out {} minutes before shift end", minutes_early),
        }
    }

    pub fn break_exceeded(duration_minutes: i64, cap_minutes: u32) -> Self {
        AlertIntent {
            alert_type: AlertType::BreakExceeded,
            severity: AlertSeverity::Info,
            message: format!(
                "Break ran {} minutes, over the {}-minute limit",
                duration_minutes, cap_minutes
            ),
        }
    }
}
