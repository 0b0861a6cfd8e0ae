use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::model::geofence::GeoFence;
use crate::utils::db_utils::{build_update_sql, execute_update};

#[derive(Deserialize, ToSchema)]
pub struct CreateGeoFence {
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
    #[schema(example = "corp-office", nullable = true)]
    pub wifi_ssid: Option<String>,
    #[schema(example = "aa:bb:cc:dd:ee:ff", nullable = true)]
    pub wifi_bssid: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct GeoFenceQuery {
    /// Filter by branch
    pub branch_id: Option<u64>,
}

const UPDATABLE_COLUMNS: &[&str] = &[
    "name",
    "latitude",
    "longitude",
    "radius_m",
    "is_check_in_location",
    "is_check_out_location",
    "wifi_ssid",
    "wifi_bssid",
    "is_active",
];

/// List geofences
#[utoipa::path(
    get,
    path = "/api/v1/geofences",
    params(GeoFenceQuery),
    responses(
        (status = 200, description = "Configured geofences", body = [GeoFence]),
        (status = 500, description = "Internal server error")
    ),
    tag = "GeoFence"
)]
pub async fn list_geofences(
    pool: web::Data<MySqlPool>,
    query: web::Query<GeoFenceQuery>,
) -> actix_web::Result<impl Responder> {
    let base = r#"
        SELECT id, branch_id, name, latitude, longitude, radius_m,
               is_check_in_location, is_check_out_location,
               wifi_ssid, wifi_bssid, is_active
        FROM geofences
    "#;

    let fences = match query.branch_id {
        Some(branch_id) => {
            let sql = format!("{} WHERE branch_id = ? ORDER BY id", base);
            sqlx::query_as::<_, GeoFence>(&sql)
                .bind(branch_id)
                .fetch_all(pool.get_ref())
                .await
        }
        None => {
            let sql = format!("{} ORDER BY id", base);
            sqlx::query_as::<_, GeoFence>(&sql)
                .fetch_all(pool.get_ref())
                .await
        }
    }
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to list geofences");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(fences))
}

/// Create a geofence
#[utoipa::path(
    post,
    path = "/api/v1/geofences",
    request_body = CreateGeoFence,
    responses(
        (status = 201, description = "Geofence created"),
        (status = 400, description = "Invalid coordinates, radius, or directionality"),
        (status = 500, description = "Internal server error")
    ),
    tag = "GeoFence"
)]
pub async fn create_geofence(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateGeoFence>,
) -> actix_web::Result<impl Responder> {
    if !payload.latitude.is_finite() || !(-90.0..=90.0).contains(&payload.latitude) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "latitude must be within -90..90"
        })));
    }
    if !payload.longitude.is_finite() || !(-180.0..=180.0).contains(&payload.longitude) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "longitude must be within -180..180"
        })));
    }
    if !payload.radius_m.is_finite() || payload.radius_m <= 0.0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "radius_m must be positive"
        })));
    }
    if !payload.is_check_in_location && !payload.is_check_out_location {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "fence must cover check-in, check-out, or both"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO geofences
            (branch_id, name, latitude, longitude, radius_m,
             is_check_in_location, is_check_out_location,
             wifi_ssid, wifi_bssid, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
        "#,
    )
    .bind(payload.branch_id)
    .bind(&payload.name)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(payload.radius_m)
    .bind(payload.is_check_in_location)
    .bind(payload.is_check_out_location)
    .bind(&payload.wifi_ssid)
    .bind(&payload.wifi_bssid)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to create geofence");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Geofence created",
        "geofence_id": result.last_insert_id()
    })))
}

/// Update a geofence
#[utoipa::path(
    put,
    path = "/api/v1/geofences/{geofence_id}",
    params(
        ("geofence_id" = u64, Path, description = "Geofence ID")
    ),
    responses(
        (status = 200, description = "Geofence updated"),
        (status = 400, description = "Unknown field or empty payload"),
        (status = 404, description = "Geofence not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "GeoFence"
)]
pub async fn update_geofence(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let geofence_id = path.into_inner();

    let update = build_update_sql("geofences", &body, UPDATABLE_COLUMNS, "id", geofence_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Geofence not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Geofence updated"
    })))
}
