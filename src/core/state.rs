//! Per-(employee, date) attendance state machine.
//!
//! Every transition is a pure function over the current snapshot (the
//! AttendanceDay row plus its BreakPeriod rows) and an event, returning the
//! next snapshot and the alert intents it raised. Persistence applies the
//! result under guarded SQL so concurrent callers lose the race with the
//! same error a sequential caller would have seen.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::core::alert::AlertIntent;
use crate::core::hours::{self, HoursBreakdown};
use crate::model::attendance_day::AttendanceDay;
use crate::model::break_period::BreakPeriod;
use crate::model::work_hours_policy::WorkHoursPolicy;

/// `NotCheckedIn -> CheckedIn -> {OnBreak <-> CheckedIn} -> CheckedOut`.
/// CheckedOut is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DayState {
    NotCheckedIn,
    CheckedIn,
    OnBreak,
    CheckedOut,
}

/// Stored classification for the day. The engine only ever produces
/// `Present` and `Late`; the remaining values are written by external batch
/// collaborators (rollups, leave, holiday calendars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    Leave,
    Holiday,
    Weekend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum BreakType {
    Lunch,
    Prayer,
    Coffee,
    Medical,
}

/// Business-rule guard violations. All are recoverable by the caller taking
/// a different action; none indicate a systemic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TransitionError {
    #[display(fmt = "already checked in today")]
    DuplicateCheckIn,
    #[display(fmt = "no active check-in found for today")]
    NoActiveCheckIn,
    #[display(fmt = "already checked out today")]
    AlreadyCheckedOut,
    #[display(fmt = "a break is still open, end it before checking out")]
    OnBreakCheckoutForbidden,
    #[display(fmt = "no open break to end")]
    NoOpenBreak,
    #[display(fmt = "a break is already open")]
    BreakAlreadyOpen,
    #[display(fmt = "daily break limit reached")]
    BreakLimitExceeded,
}

impl TransitionError {
    /// Machine-readable kind for API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            TransitionError::DuplicateCheckIn => "duplicate_check_in",
            TransitionError::NoActiveCheckIn => "no_active_check_in",
            TransitionError::AlreadyCheckedOut => "already_checked_out",
            TransitionError::OnBreakCheckoutForbidden => "on_break_checkout_forbidden",
            TransitionError::NoOpenBreak => "no_open_break",
            TransitionError::BreakAlreadyOpen => "break_already_open",
            TransitionError::BreakLimitExceeded => "break_limit_exceeded",
        }
    }
}

#[derive(Debug)]
pub struct CheckInOutcome {
    pub day: AttendanceDay,
    pub alerts: Vec<AlertIntent>,
}

#[derive(Debug)]
pub struct BreakEndOutcome {
    pub break_period: BreakPeriod,
    pub alerts: Vec<AlertIntent>,
}

#[derive(Debug)]
pub struct CheckOutOutcome {
    pub day: AttendanceDay,
    pub hours: HoursBreakdown,
    pub alerts: Vec<AlertIntent>,
}

/// Pure query: where in the day's lifecycle this snapshot sits.
///
/// A row without a check-in timestamp (a holiday/absence marker written by
/// an external job) still counts as `NotCheckedIn`.
pub fn day_state(day: Option<&AttendanceDay>, breaks: &[BreakPeriod]) -> DayState {
    match day {
        None => DayState::NotCheckedIn,
        Some(d) if d.check_in_time.is_none() => DayState::NotCheckedIn,
        Some(d) if d.check_out_time.is_some() => DayState::CheckedOut,
        Some(_) if breaks.iter().any(|b| b.break_end.is_none()) => DayState::OnBreak,
        Some(_) => DayState::CheckedIn,
    }
}

fn open_break<'a>(breaks: &'a [BreakPeriod]) -> Option<&'a BreakPeriod> {
    breaks.iter().find(|b| b.break_end.is_none())
}

/// Check-in: valid only from `NotCheckedIn`. Evaluates lateness against the
/// resolved policy; the boundary is inclusive, checking in at exactly
/// `shift_start + grace` is on time.
///
/// `existing` carries a pre-created marker row if one exists; its id and
/// approval state are preserved.
pub fn apply_check_in(
    existing: Option<&AttendanceDay>,
    employee_id: u64,
    date: NaiveDate,
    ts: NaiveDateTime,
    latitude: f64,
    longitude: f64,
    policy: &WorkHoursPolicy,
) -> Result<CheckInOutcome, TransitionError> {
    if let Some(day) = existing {
        if day.check_in_time.is_some() {
            return Err(TransitionError::DuplicateCheckIn);
        }
    }

    let deadline = policy.shift_start + Duration::minutes(policy.late_grace_minutes as i64);
    let is_late = ts.time() > deadline;

    let mut alerts = Vec::new();
    if is_late {
        let minutes_late = (ts.time() - policy.shift_start).num_minutes();
        alerts.push(AlertIntent::late_arrival(minutes_late));
    }

    let status = if is_late {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    };

    let day = AttendanceDay {
        id: existing.map(|d| d.id).unwrap_or(0),
        employee_id,
        date,
        check_in_time: Some(ts),
        check_out_time: None,
        check_in_latitude: Some(latitude),
        check_in_longitude: Some(longitude),
        check_out_latitude: None,
        check_out_longitude: None,
        status: status.to_string(),
        is_late,
        is_early_departure: false,
        total_hours: None,
        break_hours: None,
        work_hours: None,
        overtime_hours: None,
        approval_status: existing
            .map(|d| d.approval_status.clone())
            .unwrap_or_else(|| "pending".to_string()),
    };

    Ok(CheckInOutcome { day, alerts })
}

/// Break-start: valid only from `CheckedIn`, and only while the day's break
/// count is under the policy cap.
pub fn apply_break_start(
    day: &AttendanceDay,
    breaks: &[BreakPeriod],
    ts: NaiveDateTime,
    break_type: BreakType,
    policy: &WorkHoursPolicy,
) -> Result<BreakPeriod, TransitionError> {
    if day.check_in_time.is_none() {
        return Err(TransitionError::NoActiveCheckIn);
    }
    if day.check_out_time.is_some() {
        return Err(TransitionError::AlreadyCheckedOut);
    }
    if open_break(breaks).is_some() {
        return Err(TransitionError::BreakAlreadyOpen);
    }
    if break_limit_reached(breaks, policy) {
        return Err(TransitionError::BreakLimitExceeded);
    }

    Ok(BreakPeriod {
        id: 0,
        attendance_day_id: day.id,
        break_start: ts,
        break_end: None,
        duration_minutes: None,
        break_type: break_type.to_string(),
        exceeds_limit: false,
    })
}

/// Break-end: closes the single open break, computing its duration in whole
/// minutes. Durations over the policy cap flag the break and raise a
/// `break_exceeded` alert but still close normally.
pub fn apply_break_end(
    day: &AttendanceDay,
    breaks: &[BreakPeriod],
    ts: NaiveDateTime,
    policy: &WorkHoursPolicy,
) -> Result<BreakEndOutcome, TransitionError> {
    if day.check_in_time.is_none() {
        return Err(TransitionError::NoActiveCheckIn);
    }

    let Some(open) = open_break(breaks) else {
        return Err(TransitionError::NoOpenBreak);
    };

    let duration_minutes = (ts - open.break_start).num_minutes().max(0);
    let exceeds_limit = duration_minutes > policy.max_break_duration_minutes as i64;

    let mut closed = open.clone();
    closed.break_end = Some(ts);
    closed.duration_minutes = Some(duration_minutes);
    closed.exceeds_limit = exceeds_limit;

    let mut alerts = Vec::new();
    if exceeds_limit {
        alerts.push(AlertIntent::break_exceeded(
            duration_minutes,
            policy.max_break_duration_minutes,
        ));
    }

    Ok(BreakEndOutcome {
        break_period: closed,
        alerts,
    })
}

/// Check-out: valid only from `CheckedIn`; an open break must be closed
/// first. Derives the day's hours and evaluates early departure with an
/// inclusive boundary, leaving at exactly `shift_end - grace` is on time.
pub fn apply_check_out(
    day: &AttendanceDay,
    breaks: &[BreakPeriod],
    ts: NaiveDateTime,
    latitude: f64,
    longitude: f64,
    policy: &WorkHoursPolicy,
) -> Result<CheckOutOutcome, TransitionError> {
    let Some(check_in) = day.check_in_time else {
        return Err(TransitionError::NoActiveCheckIn);
    };
    if day.check_out_time.is_some() {
        return Err(TransitionError::AlreadyCheckedOut);
    }
    if open_break(breaks).is_some() {
        return Err(TransitionError::OnBreakCheckoutForbidden);
    }

    let break_minutes: i64 = breaks.iter().filter_map(|b| b.duration_minutes).sum();
    let hours = hours::compute(check_in, ts, break_minutes, policy.daily_hours);

    let cutoff = policy.shift_end - Duration::minutes(policy.early_leave_grace_minutes as i64);
    let is_early_departure = ts.time() < cutoff;

    let mut alerts = Vec::new();
    if is_early_departure {
        let minutes_early = (policy.shift_end - ts.time()).num_minutes();
        alerts.push(AlertIntent::early_departure(minutes_early));
    }

    let mut next = day.clone();
    next.check_out_time = Some(ts);
    next.check_out_latitude = Some(latitude);
    next.check_out_longitude = Some(longitude);
    next.is_early_departure = is_early_departure;
    next.total_hours = Some(hours.total_hours);
    next.break_hours = Some(hours.break_hours);
    next.work_hours = Some(hours.work_hours);
    next.overtime_hours = Some(hours.overtime_hours);

    Ok(CheckOutOutcome {
        day: next,
        hours,
        alerts,
    })
}

/// Break-count guard: closed and open breaks both count toward the cap.
pub fn break_limit_reached(breaks: &[BreakPeriod], policy: &WorkHoursPolicy) -> bool {
    breaks.len() as u32 >= policy.max_breaks_per_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alert::AlertType;

    const LAT: f64 = 24.7136;
    const LON: f64 = 46.6753;

    fn policy() -> WorkHoursPolicy {
        // 09:00-17:00, 15-minute grace, 2 breaks capped at 60 minutes.
        WorkHoursPolicy::fallback()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid fixture date")
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        date()
            .and_hms_opt(hour, minute, 0)
            .expect("valid fixture timestamp")
    }

    fn checked_in(hour: u32, minute: u32) -> AttendanceDay {
        let outcome = apply_check_in(None, 1000, date(), at(hour, minute), LAT, LON, &policy())
            .expect("check-in from empty state succeeds");
        AttendanceDay { id: 42, ..outcome.day }
    }

    fn closed_break(start: NaiveDateTime, end: NaiveDateTime) -> BreakPeriod {
        BreakPeriod {
            id: 1,
            attendance_day_id: 42,
            break_start: start,
            break_end: Some(end),
            duration_minutes: Some((end - start).num_minutes()),
            break_type: "lunch".to_string(),
            exceeds_limit: false,
        }
    }

    #[test]
    fn check_in_within_grace_is_present() {
        let outcome =
            apply_check_in(None, 1000, date(), at(9, 10), LAT, LON, &policy()).expect("accepted");
        assert_eq!(outcome.day.status, "present");
        assert!(!outcome.day.is_late);
        assert!(outcome.alerts.is_empty());
        assert_eq!(outcome.day.check_in_time, Some(at(9, 10)));
    }

    #[test]
    fn check_in_at_exact_grace_boundary_is_not_late() {
        let outcome =
            apply_check_in(None, 1000, date(), at(9, 15), LAT, LON, &policy()).expect("accepted");
        assert!(!outcome.day.is_late);
        assert!(outcome.alerts.is_empty());
    }

    #[test]
    fn check_in_one_minute_past_grace_is_late() {
        let outcome =
            apply_check_in(None, 1000, date(), at(9, 16), LAT, LON, &policy()).expect("accepted");
        assert!(outcome.day.is_late);
        assert_eq!(outcome.day.status, "late");
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].alert_type, AlertType::LateArrival);
    }

    #[test]
    fn late_check_in_scenario_emits_one_alert() {
        let outcome =
            apply_check_in(None, 1000, date(), at(9, 20), LAT, LON, &policy()).expect("accepted");
        assert!(outcome.day.is_late);
        assert_eq!(outcome.alerts.len(), 1);
        assert!(outcome.alerts[0].message.contains("20 minutes"));
    }

    #[test]
    fn second_check_in_is_rejected() {
        let day = checked_in(9, 10);
        let err = apply_check_in(Some(&day), 1000, date(), at(9, 30), LAT, LON, &policy())
            .expect_err("must reject");
        assert_eq!(err, TransitionError::DuplicateCheckIn);
    }

    #[test]
    fn check_in_fills_a_preexisting_marker_row() {
        let marker = AttendanceDay {
            check_in_time: None,
            status: "holiday".to_string(),
            ..checked_in(9, 0)
        };
        let outcome = apply_check_in(Some(&marker), 1000, date(), at(9, 5), LAT, LON, &policy())
            .expect("marker rows are still NotCheckedIn");
        assert_eq!(outcome.day.id, marker.id);
        assert_eq!(outcome.day.status, "present");
    }

    #[test]
    fn break_start_requires_check_in() {
        let day = AttendanceDay {
            check_in_time: None,
            ..checked_in(9, 0)
        };
        let err = apply_break_start(&day, &[], at(12, 0), BreakType::Lunch, &policy()).expect_err("reject");
        assert_eq!(err, TransitionError::NoActiveCheckIn);
    }

    #[test]
    fn break_start_rejected_while_on_break() {
        let day = checked_in(9, 0);
        let open = apply_break_start(&day, &[], at(12, 0), BreakType::Lunch, &policy()).expect("first opens");
        let err =
            apply_break_start(&day, &[open], at(12, 10), BreakType::Coffee, &policy()).expect_err("reject");
        assert_eq!(err, TransitionError::BreakAlreadyOpen);
    }

    #[test]
    fn break_limit_rejects_the_third_break_of_two_allowed() {
        let p = policy();
        let day = checked_in(9, 0);
        let one = closed_break(at(10, 0), at(10, 10));
        let two = closed_break(at(12, 0), at(12, 30));

        // max_breaks_per_day is 2: the second opens, a third does not.
        assert!(apply_break_start(&day, &[one.clone()], at(12, 0), BreakType::Lunch, &p).is_ok());
        let err = apply_break_start(&day, &[one.clone(), two.clone()], at(15, 0), BreakType::Coffee, &p)
            .expect_err("third break must be rejected");
        assert_eq!(err, TransitionError::BreakLimitExceeded);

        assert!(!break_limit_reached(&[one.clone()], &p));
        assert!(break_limit_reached(&[one, two], &p));
    }

    #[test]
    fn break_end_without_open_break_is_rejected() {
        let day = checked_in(9, 0);
        let err = apply_break_end(&day, &[], at(12, 45), &policy()).expect_err("reject");
        assert_eq!(err, TransitionError::NoOpenBreak);
    }

    #[test]
    fn break_end_within_cap_closes_quietly() {
        let day = checked_in(9, 0);
        let open = apply_break_start(&day, &[], at(12, 0), BreakType::Lunch, &policy()).expect("opens");
        let outcome = apply_break_end(&day, &[open], at(12, 45), &policy()).expect("closes");
        assert_eq!(outcome.break_period.duration_minutes, Some(45));
        assert!(!outcome.break_period.exceeds_limit);
        assert!(outcome.alerts.is_empty());
    }

    #[test]
    fn break_end_over_cap_flags_and_alerts() {
        let day = checked_in(9, 0);
        let open = apply_break_start(&day, &[], at(12, 0), BreakType::Lunch, &policy()).expect("opens");
        let outcome = apply_break_end(&day, &[open], at(13, 1), &policy()).expect("closes");
        assert_eq!(outcome.break_period.duration_minutes, Some(61));
        assert!(outcome.break_period.exceeds_limit);
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].alert_type, AlertType::BreakExceeded);
    }

    #[test]
    fn break_end_at_exact_cap_is_within_limit() {
        let day = checked_in(9, 0);
        let open = apply_break_start(&day, &[], at(12, 0), BreakType::Lunch, &policy()).expect("opens");
        let outcome = apply_break_end(&day, &[open], at(13, 0), &policy()).expect("closes");
        assert!(!outcome.break_period.exceeds_limit);
    }

    #[test]
    fn check_out_forbidden_while_on_break() {
        let day = checked_in(9, 0);
        let open = apply_break_start(&day, &[], at(12, 0), BreakType::Lunch, &policy()).expect("opens");
        let err = apply_check_out(&day, &[open], at(17, 0), LAT, LON, &policy())
            .expect_err("reject");
        assert_eq!(err, TransitionError::OnBreakCheckoutForbidden);
    }

    #[test]
    fn check_out_without_check_in_is_rejected() {
        let day = AttendanceDay {
            check_in_time: None,
            ..checked_in(9, 0)
        };
        let err = apply_check_out(&day, &[], at(17, 0), LAT, LON, &policy()).expect_err("reject");
        assert_eq!(err, TransitionError::NoActiveCheckIn);
    }

    #[test]
    fn check_out_is_terminal() {
        let day = checked_in(9, 0);
        let outcome = apply_check_out(&day, &[], at(17, 0), LAT, LON, &policy()).expect("accepted");
        let err = apply_check_out(&outcome.day, &[], at(18, 0), LAT, LON, &policy())
            .expect_err("reject");
        assert_eq!(err, TransitionError::AlreadyCheckedOut);

        let err = apply_check_in(Some(&outcome.day), 1000, date(), at(18, 0), LAT, LON, &policy())
            .expect_err("no re-entry after check-out");
        assert_eq!(err, TransitionError::DuplicateCheckIn);
    }

    #[test]
    fn check_out_at_exact_early_boundary_is_on_time() {
        let day = checked_in(9, 0);
        // shift_end 17:00 minus 15 minutes grace: 16:45 exactly is fine.
        let outcome = apply_check_out(&day, &[], at(16, 45), LAT, LON, &policy()).expect("ok");
        assert!(!outcome.day.is_early_departure);
        assert!(outcome.alerts.is_empty());
    }

    #[test]
    fn check_out_one_minute_early_raises_alert() {
        let day = checked_in(9, 0);
        let outcome = apply_check_out(&day, &[], at(16, 44), LAT, LON, &policy()).expect("ok");
        assert!(outcome.day.is_early_departure);
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].alert_type, AlertType::EarlyDeparture);
        assert!(outcome.alerts[0].message.contains("16 minutes"));
    }

    #[test]
    fn full_day_scenario_derives_expected_hours() {
        // Shift 09:00-17:00, grace 15, expected 8h. Check-in 09:10, lunch
        // 12:00-12:45, check-out 18:00.
        let p = policy();
        let day = checked_in(9, 10);
        assert_eq!(day.status, "present");

        let open = apply_break_start(&day, &[], at(12, 0), BreakType::Lunch, &policy()).expect("opens");
        let closed = apply_break_end(&day, &[open], at(12, 45), &p)
            .expect("closes")
            .break_period;

        let outcome = apply_check_out(&day, &[closed], at(18, 0), LAT, LON, &p).expect("ok");
        let eps = 1e-9;
        assert!((outcome.hours.work_hours - 8.25).abs() < eps);
        assert!((outcome.hours.break_hours - 0.75).abs() < eps);
        assert!((outcome.hours.overtime_hours - 0.25).abs() < eps);
        assert!((outcome.hours.total_hours - 9.0).abs() < eps);
        assert!(!outcome.day.is_early_departure);

        assert_eq!(outcome.day.total_hours, Some(outcome.hours.total_hours));
        assert_eq!(outcome.day.work_hours, Some(outcome.hours.work_hours));
    }

    #[test]
    fn day_state_tracks_the_lifecycle() {
        assert_eq!(day_state(None, &[]), DayState::NotCheckedIn);

        let day = checked_in(9, 0);
        assert_eq!(day_state(Some(&day), &[]), DayState::CheckedIn);

        let open = apply_break_start(&day, &[], at(12, 0), BreakType::Lunch, &policy()).expect("opens");
        assert_eq!(day_state(Some(&day), &[open.clone()]), DayState::OnBreak);

        let closed = apply_break_end(&day, &[open], at(12, 30), &policy())
            .expect("closes")
            .break_period;
        assert_eq!(day_state(Some(&day), &[closed.clone()]), DayState::CheckedIn);

        let done = apply_check_out(&day, &[closed], at(17, 0), LAT, LON, &policy())
            .expect("ok")
            .day;
        assert_eq!(day_state(Some(&done), &[]), DayState::CheckedOut);
    }
}
