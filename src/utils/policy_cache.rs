use anyhow::Result;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::core::policy;
use crate::model::work_hours_policy::WorkHoursPolicy;

/// Key 0 caches the global resolution (no department match).
const GLOBAL_KEY: u64 = 0;

/// Resolved policy per department id. Short TTL: policy edits must become
/// visible without a restart, and admin mutations invalidate eagerly anyway.
pub static POLICY_CACHE: Lazy<Cache<u64, WorkHoursPolicy>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(300))
        .build()
});

/// Resolve the active policy for a department, cached.
///
/// A database failure here resolves to the hard-coded fallback instead of
/// failing the attendance request: recording availability wins over policy
/// precision.
pub async fn resolve_for_department(pool: &MySqlPool, department_id: u64) -> WorkHoursPolicy {
    let key = if department_id == 0 { GLOBAL_KEY } else { department_id };

    if let Some(hit) = POLICY_CACHE.get(&key).await {
        return hit;
    }

    let snapshot = match load_active_policies(pool).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, department_id, "Policy load failed, using fallback");
            return WorkHoursPolicy::fallback();
        }
    };

    let resolved = policy::resolve(&snapshot, department_id);
    POLICY_CACHE.insert(key, resolved.clone()).await;
    resolved
}

/// Drop every cached resolution. Called after policy create/update.
pub fn invalidate_all() {
    POLICY_CACHE.invalidate_all();
}

async fn load_active_policies(pool: &MySqlPool) -> Result<Vec<WorkHoursPolicy>> {
    let rows = sqlx::query_as::<_, WorkHoursPolicy>(
        r#"
        SELECT id, department_id, daily_hours, shift_start, shift_end,
               late_grace_minutes, early_leave_grace_minutes,
               max_breaks_per_day, max_break_duration_minutes,
               overtime_rate, holiday_overtime_rate, is_active
        FROM work_hours_policies
        WHERE is_active = 1
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Pre-resolve the policy for every department at startup so the first
/// check-in of the day does not pay the snapshot query.
pub async fn warmup_policy_cache(pool: &MySqlPool) -> Result<()> {
    let snapshot = load_active_policies(pool).await?;

    let department_ids =
        sqlx::query_as::<_, (u64,)>("SELECT id FROM departments ORDER BY id")
            .fetch_all(pool)
            .await?;

    let mut warmed = 0usize;
    for (department_id,) in department_ids {
        let resolved = policy::resolve(&snapshot, department_id);
        POLICY_CACHE.insert(department_id, resolved).await;
        warmed += 1;
    }
    POLICY_CACHE
        .insert(GLOBAL_KEY, policy::resolve(&snapshot, GLOBAL_KEY))
        .await;

    log::info!(
        "Policy cache warmup complete: {} departments, {} active policies",
        warmed,
        snapshot.len()
    );

    Ok(())
}
