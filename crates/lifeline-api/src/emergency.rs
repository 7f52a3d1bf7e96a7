use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use lifeline_types::api::{Claims, EmergencyResponse, UpdateEmergencyStatusRequest};
use lifeline_types::models::EmergencyStatus;

use crate::AppState;
use crate::error::ApiError;

/// The caller's emergency history, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_emergencies(&claims.sub.to_string())?;

    let history: Vec<EmergencyResponse> = rows
        .into_iter()
        .map(|row| EmergencyResponse {
            id: row.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt emergency id '{}': {}", row.id, e);
                Uuid::default()
            }),
            latitude: row.latitude,
            longitude: row.longitude,
            location_name: row.location_name,
            status: row.status,
            description: row.description,
            timestamp: parse_sqlite_timestamp(&row.created_at, &row.id),
        })
        .collect();

    Ok(Json(history))
}

/// Owner-only status flip between `active` and `resolved`.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(emergency_id): Path<Uuid>,
    Form(req): Form<UpdateEmergencyStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status: EmergencyStatus = req
        .status
        .parse()
        .map_err(|_| ApiError::invalid("Status must be 'active' or 'resolved'"))?;

    state
        .db
        .update_emergency_status(&emergency_id.to_string(), &claims.sub.to_string(), status)
        .map_err(|e| match e {
            lifeline_db::StoreError::NotFound => ApiError::NotFound("Emergency"),
            other => other.into(),
        })?;

    Ok(Json(serde_json::json!({
        "message": format!("Emergency status updated to {status}")
    })))
}

fn parse_sqlite_timestamp(raw: &str, record_id: &str) -> chrono::DateTime<chrono::Utc> {
    raw.parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on emergency '{}': {}", raw, record_id, e);
            chrono::DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_default_format() {
        let ts = parse_sqlite_timestamp("2026-08-30 12:30:45", "e1");
        assert_eq!(ts.to_rfc3339(), "2026-08-30T12:30:45+00:00");
    }

    #[test]
    fn parses_rfc3339() {
        let ts = parse_sqlite_timestamp("2026-08-30T12:30:45Z", "e1");
        assert_eq!(ts, parse_sqlite_timestamp("2026-08-30 12:30:45", "e1"));
    }
}
