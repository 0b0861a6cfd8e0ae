use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Physical site an employee reports to. Carries how check-in/out events
/// are verified at that site.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Branch {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Riyadh HQ")]
    pub name: String,
    /// gps|wifi|both|manual
    #[schema(example = "gps")]
    pub verification_method: String,
    pub geofence_enforced: bool,
}
