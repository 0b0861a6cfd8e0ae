use chrono::NaiveDateTime;
use serde::Serialize;

/// Derived figures for a completed day. Stored unrounded; presentation
/// layers round for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoursBreakdown {
    pub total_hours: f64,
    pub break_hours: f64,
    pub work_hours: f64,
    pub overtime_hours: f64,
}

/// Derive total/break/work/overtime hours from the day's bracketing
/// timestamps and the sum of closed break durations. Infallible: the state
/// machine guarantees both timestamps exist and no break is open, and
/// inconsistent break data floors work time at zero instead of going
/// negative.
pub fn compute(
    check_in: NaiveDateTime,
    check_out: NaiveDateTime,
    break_minutes: i64,
    expected_daily_hours: f64,
) -> HoursBreakdown {
    let total_minutes = (check_out - check_in).num_minutes().max(0);
    let break_minutes = break_minutes.max(0);
    let work_minutes = (total_minutes - break_minutes).max(0);

    let work_hours = work_minutes as f64 / 60.0;
    let break_hours = break_minutes as f64 / 60.0;
    let overtime_hours = (work_hours - expected_daily_hours).max(0.0);

    HoursBreakdown {
        total_hours: work_hours + break_hours,
        break_hours,
        work_hours,
        overtime_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EPS: f64 = 1e-9;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid fixture timestamp")
    }

    #[test]
    fn worked_example_09_10_to_18_00_with_45_minute_break() {
        let h = compute(at(9, 10), at(18, 0), 45, 8.0);
        assert!((h.work_hours - 8.25).abs() < EPS);
        assert!((h.break_hours - 0.75).abs() < EPS);
        assert!((h.overtime_hours - 0.25).abs() < EPS);
        assert!((h.total_hours - 9.0).abs() < EPS);
    }

    #[test]
    fn no_overtime_under_expected_hours() {
        let h = compute(at(9, 0), at(16, 0), 0, 8.0);
        assert!((h.work_hours - 7.0).abs() < EPS);
        assert_eq!(h.overtime_hours, 0.0);
    }

    #[test]
    fn work_time_never_goes_negative() {
        // Break data exceeding elapsed time is inconsistent; floor at zero.
        let h = compute(at(9, 0), at(10, 0), 600, 8.0);
        assert_eq!(h.work_hours, 0.0);
        assert!((h.break_hours - 10.0).abs() < EPS);
        assert!((h.total_hours - (h.work_hours + h.break_hours)).abs() < EPS);
    }

    #[test]
    fn inverted_timestamps_collapse_to_zero() {
        let h = compute(at(18, 0), at(9, 0), 30, 8.0);
        assert_eq!(h.work_hours, 0.0);
        assert_eq!(h.overtime_hours, 0.0);
    }

    #[test]
    fn hours_conservation_across_break_layouts() {
        // total == work + break for any set of non-overlapping breaks.
        for breaks in [vec![], vec![15], vec![30, 20], vec![60, 45, 10], vec![5; 8]] {
            let break_minutes: i64 = breaks.iter().sum();
            let h = compute(at(8, 30), at(19, 10), break_minutes, 8.0);
            assert!(
                (h.total_hours - (h.work_hours + h.break_hours)).abs() < EPS,
                "conservation violated for {breaks:?}"
            );
        }
    }
}
