use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real headcount.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Membership prefilter over employee ids: check-in/out requests for ids the
/// filter has never seen can be rejected without a database round trip.
/// False positives fall through to the real lookup; there are no false
/// negatives as long as every created employee is inserted.
static EMPLOYEE_FILTER: Lazy<RwLock<CuckooFilter<u64>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

/// Check if an employee id might exist (false positives possible)
pub fn might_exist(employee_id: u64) -> bool {
    EMPLOYEE_FILTER
        .read()
        .expect("employee filter poisoned")
        .contains(&employee_id)
}

/// Insert a single employee id into the filter
pub fn insert(employee_id: u64) {
    EMPLOYEE_FILTER
        .write()
        .expect("employee filter poisoned")
        .add(&employee_id);
}

/// Remove an employee id from the filter
pub fn remove(employee_id: u64) {
    EMPLOYEE_FILTER
        .write()
        .expect("employee filter poisoned")
        .remove(&employee_id);
}

/// Warm up the employee filter using streaming + batching
pub async fn warmup_employee_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64,)>("SELECT id FROM employees").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (employee_id,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;
        batch.push(employee_id);
        total_count += 1;

        if batch.len() >= batch_size {
            flush(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        flush(&batch);
    }

    log::info!("Employee filter warmup complete: {} ids", total_count);

    Ok(())
}

fn flush(batch: &[u64]) {
    let mut filter = EMPLOYEE_FILTER.write().expect("employee filter poisoned");
    for id in batch {
        filter.add(id);
    }
}
