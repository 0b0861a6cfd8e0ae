use crate::model::work_hours_policy::WorkHoursPolicy;

/// Resolve the work-hours policy for a department out of a configuration
/// snapshot. Precedence: active department-scoped policy, then the active
/// global policy (NULL department), then `WorkHoursPolicy::fallback()`.
///
/// Total and deterministic: the same snapshot always yields the same policy,
/// and missing configuration is not an error. Within a scope the lowest id
/// wins, so duplicated rows cannot make resolution flip between calls.
pub fn resolve(policies: &[WorkHoursPolicy], department_id: u64) -> WorkHoursPolicy {
    if let Some(p) = policies
        .iter()
        .filter(|p| p.is_active && p.department_id == Some(department_id))
        .min_by_key(|p| p.id)
    {
        return p.clone();
    }

    policies
        .iter()
        .filter(|p| p.is_active && p.department_id.is_none())
        .min_by_key(|p| p.id)
        .cloned()
        .unwrap_or_else(WorkHoursPolicy::fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(id: u64, department_id: Option<u64>, daily_hours: f64, active: bool) -> WorkHoursPolicy {
        WorkHoursPolicy {
            id,
            department_id,
            daily_hours,
            is_active: active,
            ..WorkHoursPolicy::fallback()
        }
    }

    #[test]
    fn department_policy_beats_global() {
        let snapshot = vec![
            policy(1, None, 7.5, true),
            policy(2, Some(10), 9.0, true),
        ];
        assert_eq!(resolve(&snapshot, 10).id, 2);
        assert_eq!(resolve(&snapshot, 11).id, 1);
    }

    #[test]
    fn inactive_policies_are_invisible() {
        let snapshot = vec![
            policy(1, Some(10), 9.0, false),
            policy(2, None, 7.5, false),
        ];
        // Nothing active resolves, so the fallback applies.
        assert_eq!(resolve(&snapshot, 10).id, 0);
    }

    #[test]
    fn empty_snapshot_yields_hardcoded_fallback() {
        let resolved = resolve(&[], 10);
        assert_eq!(resolved.daily_hours, 8.0);
        assert_eq!(resolved.late_grace_minutes, 15);
        assert_eq!(resolved.max_breaks_per_day, 2);
        assert_eq!(resolved.max_break_duration_minutes, 60);
    }

    #[test]
    fn duplicate_scope_resolves_to_lowest_id() {
        let snapshot = vec![
            policy(7, Some(10), 9.0, true),
            policy(3, Some(10), 6.0, true),
        ];
        assert_eq!(resolve(&snapshot, 10).id, 3);
    }
}
