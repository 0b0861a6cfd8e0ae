use crate::model::geofence::GeoFence;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in meters between two WGS84 points (haversine).
/// Planar approximations drift badly away from the equator, so the full
/// formula is used regardless of latitude.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * 1000.0 * c
}

/// How a branch verifies that an employee is physically on site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum VerificationMethod {
    Gps,
    Wifi,
    Both,
    Manual,
}

impl VerificationMethod {
    /// Unknown configuration strings degrade to GPS-only rather than
    /// blocking check-ins on a typo in the branches table.
    pub fn parse_or_gps(value: &str) -> Self {
        VerificationMethod::from_str(value).unwrap_or(VerificationMethod::Gps)
    }
}

/// Location and network signature as reported by the client device.
#[derive(Debug, Clone, Copy)]
pub struct LocationReport<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub wifi_ssid: Option<&'a str>,
    pub wifi_bssid: Option<&'a str>,
}

/// Pure verification verdict. `distance_m` is present whenever a distance
/// was computed so callers can tell the employee how far off they are.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoDecision {
    Accepted,
    Rejected {
        reason: String,
        distance_m: Option<f64>,
    },
}

impl GeoDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GeoDecision::Accepted)
    }
}

/// Decide whether a reported location satisfies the branch's verification
/// method against the fence configured for the requested direction.
///
/// `fence` is the already-selected active fence for (branch, direction);
/// `None` means nothing is configured, which rejects every non-manual
/// method. `Both` requires GPS and WiFi to pass. Pure, no side effects.
pub fn verify(
    fence: Option<&GeoFence>,
    method: VerificationMethod,
    report: &LocationReport<'_>,
) -> GeoDecision {
    if method == VerificationMethod::Manual {
        return GeoDecision::Accepted;
    }

    let Some(fence) = fence else {
        return GeoDecision::Rejected {
            reason: "no location configured".to_string(),
            distance_m: None,
        };
    };

    match method {
        VerificationMethod::Gps => gps_decision(fence, report),
        VerificationMethod::Wifi => match wifi_match(fence, report) {
            Ok(()) => GeoDecision::Accepted,
            Err(reason) => GeoDecision::Rejected {
                reason,
                distance_m: None,
            },
        },
        VerificationMethod::Both => match gps_decision(fence, report) {
            GeoDecision::Accepted => match wifi_match(fence, report) {
                Ok(()) => GeoDecision::Accepted,
                Err(reason) => GeoDecision::Rejected {
                    reason,
                    distance_m: None,
                },
            },
            rejected => rejected,
        },
        VerificationMethod::Manual => GeoDecision::Accepted,
    }
}

// Boundary is inclusive: a point at exactly the radius is on site.
fn gps_decision(fence: &GeoFence, report: &LocationReport<'_>) -> GeoDecision {
    let distance_m = haversine_distance_m(
        report.latitude,
        report.longitude,
        fence.latitude,
        fence.longitude,
    );
    if distance_m <= fence.radius_m {
        GeoDecision::Accepted
    } else {
        GeoDecision::Rejected {
            reason: "outside geofence".to_string(),
            distance_m: Some(distance_m),
        }
    }
}

fn wifi_match(fence: &GeoFence, report: &LocationReport<'_>) -> Result<(), String> {
    let Some(expected_ssid) = fence.wifi_ssid.as_deref() else {
        return Err("no network signature configured".to_string());
    };

    match report.wifi_ssid {
        Some(ssid) if ssid.eq_ignore_ascii_case(expected_ssid) => {}
        _ => return Err("wifi network mismatch".to_string()),
    }

    // BSSID is checked only when the fence pins a specific access point.
    if let Some(expected_bssid) = fence.wifi_bssid.as_deref() {
        match report.wifi_bssid {
            Some(bssid) if bssid.eq_ignore_ascii_case(expected_bssid) => {}
            _ => return Err("wifi access point mismatch".to_string()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Meters per degree of latitude on the 6371 km sphere.
    const M_PER_DEG_LAT: f64 = EARTH_RADIUS_KM * 1000.0 * std::f64::consts::PI / 180.0;

    fn fence() -> GeoFence {
        GeoFence {
            id: 1,
            branch_id: 1,
            name: "HQ".to_string(),
            latitude: 24.7136,
            longitude: 46.6753,
            radius_m: 100.0,
            is_check_in_location: true,
            is_check_out_location: true,
            wifi_ssid: Some("corp-office".to_string()),
            wifi_bssid: None,
            is_active: true,
        }
    }

    fn report_at(latitude: f64, longitude: f64) -> LocationReport<'static> {
        LocationReport {
            latitude,
            longitude,
            wifi_ssid: None,
            wifi_bssid: None,
        }
    }

    /// A point `meters` due north of the given latitude.
    fn north_of(latitude: f64, meters: f64) -> f64 {
        latitude + meters / M_PER_DEG_LAT
    }

    #[test]
    fn distance_of_coincident_points_is_zero() {
        let d = haversine_distance_m(24.7136, 46.6753, 24.7136, 46.6753);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn distance_along_meridian_matches_arc_length() {
        let f = fence();
        let d = haversine_distance_m(north_of(f.latitude, 150.0), f.longitude, f.latitude, f.longitude);
        // Meridian arcs are exact on a sphere; allow sub-centimeter error.
        assert!((d - 150.0).abs() < 0.01, "got {d}");
    }

    #[test]
    fn point_150m_away_is_rejected_with_distance() {
        let f = fence();
        let report = report_at(north_of(f.latitude, 150.0), f.longitude);
        match verify(Some(&f), VerificationMethod::Gps, &report) {
            GeoDecision::Rejected { reason, distance_m } => {
                assert_eq!(reason, "outside geofence");
                let d = distance_m.expect("distance must be reported");
                assert!((d - 150.0).abs() < 0.5, "got {d}");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn point_exactly_on_radius_is_accepted() {
        let mut f = fence();
        let report = report_at(north_of(f.latitude, 80.0), f.longitude);
        let d = haversine_distance_m(report.latitude, report.longitude, f.latitude, f.longitude);

        f.radius_m = d;
        assert_eq!(
            verify(Some(&f), VerificationMethod::Gps, &report),
            GeoDecision::Accepted
        );

        // A centimeter short of the point and it is off site again.
        f.radius_m = d - 0.01;
        assert!(!verify(Some(&f), VerificationMethod::Gps, &report).is_accepted());
    }

    #[test]
    fn missing_fence_rejects_without_distance() {
        let report = report_at(24.7136, 46.6753);
        match verify(None, VerificationMethod::Gps, &report) {
            GeoDecision::Rejected { reason, distance_m } => {
                assert_eq!(reason, "no location configured");
                assert!(distance_m.is_none());
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn manual_method_accepts_anything() {
        let report = report_at(0.0, 0.0);
        assert_eq!(verify(None, VerificationMethod::Manual, &report), GeoDecision::Accepted);
    }

    #[test]
    fn wifi_method_matches_ssid_case_insensitively() {
        let f = fence();
        let mut report = report_at(0.0, 0.0); // coordinates ignored for wifi-only
        report.wifi_ssid = Some("Corp-Office");
        assert_eq!(verify(Some(&f), VerificationMethod::Wifi, &report), GeoDecision::Accepted);

        report.wifi_ssid = Some("guest-wifi");
        assert!(!verify(Some(&f), VerificationMethod::Wifi, &report).is_accepted());
    }

    #[test]
    fn wifi_method_checks_bssid_when_pinned() {
        let mut f = fence();
        f.wifi_bssid = Some("aa:bb:cc:dd:ee:ff".to_string());
        let mut report = report_at(0.0, 0.0);
        report.wifi_ssid = Some("corp-office");

        report.wifi_bssid = Some("AA:BB:CC:DD:EE:FF");
        assert_eq!(verify(Some(&f), VerificationMethod::Wifi, &report), GeoDecision::Accepted);

        report.wifi_bssid = Some("11:22:33:44:55:66");
        assert!(!verify(Some(&f), VerificationMethod::Wifi, &report).is_accepted());
    }

    #[test]
    fn both_requires_gps_and_wifi() {
        let f = fence();
        let mut inside = report_at(f.latitude, f.longitude);
        inside.wifi_ssid = Some("corp-office");
        assert_eq!(verify(Some(&f), VerificationMethod::Both, &inside), GeoDecision::Accepted);

        // On site but on the wrong network.
        inside.wifi_ssid = Some("guest-wifi");
        assert!(!verify(Some(&f), VerificationMethod::Both, &inside).is_accepted());

        // Right network but 150m away; the rejection carries the distance.
        let mut outside = report_at(north_of(f.latitude, 150.0), f.longitude);
        outside.wifi_ssid = Some("corp-office");
        match verify(Some(&f), VerificationMethod::Both, &outside) {
            GeoDecision::Rejected { distance_m, .. } => assert!(distance_m.is_some()),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn unknown_method_string_degrades_to_gps() {
        assert_eq!(VerificationMethod::parse_or_gps("both"), VerificationMethod::Both);
        assert_eq!(VerificationMethod::parse_or_gps("retina-scan"), VerificationMethod::Gps);
    }
}
