use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use lifeline_db::models::ZoneRow;
use lifeline_types::api::{Claims, CreateZoneRequest, UpdateZoneRequest, ZoneResponse};
use lifeline_types::models::Point;

use crate::AppState;
use crate::error::ApiError;

/// Zone geometry is validated at this boundary so degenerate zones never
/// reach the geofence evaluator.
fn validate_geometry(latitude: f64, longitude: f64, radius: f64) -> Result<(), ApiError> {
    if !Point::new(latitude, longitude).in_range() {
        return Err(ApiError::invalid(
            "Latitude must be in [-90, 90] and longitude in [-180, 180]",
        ));
    }
    if !(radius > 0.0) {
        return Err(ApiError::invalid("Radius must be a positive number of meters"));
    }
    Ok(())
}

fn to_response(row: ZoneRow) -> ZoneResponse {
    ZoneResponse {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt zone id '{}': {}", row.id, e);
            Uuid::default()
        }),
        name: row.name,
        latitude: row.latitude,
        longitude: row.longitude,
        radius: row.radius,
        description: row.description,
    }
}

pub async fn list_zones(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_zones(&claims.sub.to_string())?;
    let zones: Vec<ZoneResponse> = rows.into_iter().map(to_response).collect();
    Ok(Json(zones))
}

pub async fn create_zone(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateZoneRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::invalid("Zone name is required"));
    }
    validate_geometry(req.latitude, req.longitude, req.radius)?;

    let row = ZoneRow {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.to_string(),
        name: req.name,
        latitude: req.latitude,
        longitude: req.longitude,
        radius: req.radius,
        description: req.description,
    };
    state.db.insert_zone(&row)?;

    Ok((StatusCode::CREATED, Json(to_response(row))))
}

/// Fetch a zone and check the caller owns it: missing reads as 404,
/// someone else's zone as 403.
fn owned_zone(state: &AppState, zone_id: Uuid, claims: &Claims) -> Result<ZoneRow, ApiError> {
    let row = state
        .db
        .get_zone(&zone_id.to_string())?
        .ok_or(ApiError::NotFound("Safety zone"))?;
    if row.user_id != claims.sub.to_string() {
        return Err(ApiError::Unauthorized);
    }
    Ok(row)
}

pub async fn update_zone(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(zone_id): Path<Uuid>,
    Json(req): Json<UpdateZoneRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut row = owned_zone(&state, zone_id, &claims)?;

    if let Some(name) = req.name {
        row.name = name;
    }
    if let Some(latitude) = req.latitude {
        row.latitude = latitude;
    }
    if let Some(longitude) = req.longitude {
        row.longitude = longitude;
    }
    if let Some(radius) = req.radius {
        row.radius = radius;
    }
    if let Some(description) = req.description {
        row.description = Some(description);
    }

    validate_geometry(row.latitude, row.longitude, row.radius)?;
    state.db.update_zone(&row)?;

    Ok(Json(to_response(row)))
}

pub async fn delete_zone(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(zone_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    owned_zone(&state, zone_id, &claims)?;
    state.db.delete_zone(&zone_id.to_string())?;
    Ok(Json(serde_json::json!({ "message": "Safety zone deleted successfully" })))
}
