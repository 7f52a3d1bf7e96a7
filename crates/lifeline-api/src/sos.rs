use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use lifeline_alerts::NormalizedContact;
use lifeline_alerts::message::maps_directions_link;
use lifeline_alerts::phone::normalize_for_storage;
use lifeline_geo::geocode::UNKNOWN_LOCATION;
use lifeline_geo::{Zone, is_within_any_zone};
use lifeline_types::api::{
    Claims, ShareLocationRequest, ShareLocationResponse, SosRequest, SosResponse,
};
use lifeline_types::models::Point;

use crate::AppState;
use crate::error::ApiError;

fn require_point(latitude: Option<f64>, longitude: Option<f64>) -> Result<Point, ApiError> {
    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        return Err(ApiError::invalid("Location data not provided"));
    };
    let point = Point::new(latitude, longitude);
    if !point.in_range() {
        return Err(ApiError::invalid("Coordinates out of range"));
    }
    Ok(point)
}

/// Best-effort reverse geocode: a provider fault degrades to the sentinel
/// instead of failing the request.
async fn resolve_location(state: &AppState, point: Point) -> String {
    match state.geocoder.reverse(point).await {
        Ok(name) => name,
        Err(e) => {
            warn!("Reverse geocoding failed for {}: {}", point, e);
            UNKNOWN_LOCATION.to_string()
        }
    }
}

fn normalized_contacts(state: &AppState, user_id: &str) -> Result<Vec<NormalizedContact>, ApiError> {
    let rows = state.db.list_contacts(user_id)?;
    Ok(rows
        .into_iter()
        .map(|row| NormalizedContact {
            name: row.name,
            phone: normalize_for_storage(&row.phone, &state.country_code),
            relationship: row.relationship,
        })
        .collect())
}

/// The SOS pipeline: validate, geocode (best-effort), evaluate geofences,
/// persist the emergency record, then fan out alerts. Persistence is the
/// durability checkpoint — once the record exists, alert failure downgrades
/// the response but never discards the incident.
pub async fn trigger_sos(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SosRequest>,
) -> Result<Response, ApiError> {
    let point = require_point(req.latitude, req.longitude)?;
    let user_id = claims.sub.to_string();

    let user = state
        .db
        .get_user_by_id(&user_id)?
        .ok_or(ApiError::NotFound("User"))?;

    let location_name = resolve_location(&state, point).await;

    let zones: Vec<Zone> = state
        .db
        .list_zones(&user_id)?
        .into_iter()
        .map(|z| Zone::new(Point::new(z.latitude, z.longitude), z.radius))
        .collect();
    let in_safety_zone = is_within_any_zone(point, &zones);

    let emergency_id = Uuid::new_v4();
    state.db.insert_emergency(
        &emergency_id.to_string(),
        &user_id,
        point.latitude,
        point.longitude,
        &location_name,
        "Emergency SOS triggered",
    )?;
    info!(
        "Emergency {} recorded for {} at {} ({})",
        emergency_id, user.username, point, location_name
    );

    let contacts = normalized_contacts(&state, &user_id)?;
    let outcome = state
        .alerts
        .dispatch(&user.username, point, &location_name, in_safety_zone, &contacts)
        .await;

    if !outcome.success {
        warn!(
            "Emergency {} recorded but no alert channel succeeded ({} / {})",
            emergency_id, outcome.broadcast.detail, outcome.sms.detail
        );
        // The incident is durable; tell the caller so even though alerting
        // failed end to end.
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": "Emergency recorded but alert sending failed",
                "emergency_id": emergency_id,
                "location": location_name,
                "in_safety_zone": in_safety_zone,
            })),
        )
            .into_response());
    }

    Ok(Json(SosResponse {
        message: "SOS alert sent successfully".to_string(),
        emergency_id,
        location: location_name,
        in_safety_zone,
        maps_link: maps_directions_link(point),
        pushbullet_status: outcome.broadcast.detail,
        twilio_status: outcome.sms.detail,
    })
    .into_response())
}

/// Append-only location share: geocode, log the Location row, then push a
/// best-effort SMS update to the contacts.
pub async fn share_location(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ShareLocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let point = require_point(req.latitude, req.longitude)?;
    let user_id = claims.sub.to_string();

    let location_name = resolve_location(&state, point).await;

    state.db.insert_location(
        &Uuid::new_v4().to_string(),
        &user_id,
        point.latitude,
        point.longitude,
        &location_name,
    )?;

    let contacts = normalized_contacts(&state, &user_id)?;
    let sent = state
        .alerts
        .share_location(&claims.username, point, &location_name, &contacts)
        .await;
    info!(
        "Location share from {} reached {} of {} contacts",
        claims.username,
        sent,
        contacts.len()
    );

    Ok(Json(ShareLocationResponse {
        message: "Location shared successfully".to_string(),
        location: location_name,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lifeline_alerts::ProviderDispatcher;
    use lifeline_db::Database;
    use lifeline_geo::geocode::Geocoder;

    use super::*;
    use crate::AppStateInner;

    #[test]
    fn missing_coordinates_rejected_before_side_effects() {
        assert!(require_point(None, Some(77.59)).is_err());
        assert!(require_point(Some(12.97), None).is_err());
        assert!(require_point(None, None).is_err());
    }

    #[test]
    fn zero_is_a_valid_coordinate() {
        // (0, 0) is a real place; presence, not truthiness, is what counts.
        assert!(require_point(Some(0.0), Some(0.0)).is_ok());
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        assert!(require_point(Some(95.0), Some(0.0)).is_err());
        assert!(require_point(Some(0.0), Some(-200.0)).is_err());
    }

    #[tokio::test]
    async fn geocoder_fault_still_records_the_emergency() {
        let db = Database::open_in_memory().unwrap();
        let user_id = Uuid::new_v4();
        db.create_user(&user_id.to_string(), "asha", "asha@example.com", "hash", None)
            .unwrap();

        // Nothing listens on the geocoder port and no alert channel is
        // configured: the worst case short of a store fault.
        let state: AppState = Arc::new(AppStateInner {
            db,
            jwt_secret: "test-secret".into(),
            country_code: "+91".into(),
            geocoder: Geocoder::new("http://127.0.0.1:9"),
            alerts: ProviderDispatcher::new(None, None),
        });

        let claims = Claims {
            sub: user_id,
            username: "asha".into(),
            exp: 0,
        };
        let req = SosRequest {
            latitude: Some(12.9716),
            longitude: Some(77.5946),
        };

        let response = trigger_sos(State(state.clone()), Extension(claims), Json(req))
            .await
            .unwrap();

        // Recorded but not alerted: the response is a 500 that still names
        // the incident and the sentinel location.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["location"], UNKNOWN_LOCATION);
        assert!(body["emergency_id"].is_string());

        // The durability checkpoint held regardless of everything downstream.
        let history = state.db.list_emergencies(&user_id.to_string()).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, "active");
        assert_eq!(history[0].location_name, UNKNOWN_LOCATION);
        assert_eq!(history[0].id, body["emergency_id"]);
    }
}
