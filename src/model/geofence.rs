use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named circular location. `radius_m` must be positive; the inside test
/// uses great-circle distance against the center.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct GeoFence {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 3)]
    pub branch_id: u64,
    #[schema(example = "HQ main gate")]
    pub name: String,
    #[schema(example = 24.7136)]
    pub latitude: f64,
    #[schema(example = 46.6753)]
    pub longitude: f64,
    #[schema(example = 100.0)]
    pub radius_m: f64,
    pub is_check_in_location: bool,
    pub is_check_out_location: bool,
    /// Expected network signature when the branch verifies over WiFi.
    #[schema(example = "corp-office", nullable = true)]
    pub wifi_ssid: Option<String>,
    #[schema(example = "aa:bb:cc:dd:ee:ff", nullable = true)]
    pub wifi_bssid: Option<String>,
    pub is_active: bool,
}
