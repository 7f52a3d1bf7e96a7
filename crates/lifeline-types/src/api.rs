use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- JWT Claims --

/// JWT claims shared between the REST middleware and the auth handlers.
/// Canonical definition lives here in lifeline-types to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- SOS / location sharing --

/// Coordinates arrive as optional fields so a missing value produces our own
/// 400 instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct SosRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SosResponse {
    pub message: String,
    pub emergency_id: Uuid,
    pub location: String,
    pub in_safety_zone: bool,
    pub maps_link: String,
    pub pushbullet_status: String,
    pub twilio_status: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareLocationRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ShareLocationResponse {
    pub message: String,
    pub location: String,
}

// -- Safety zones --

#[derive(Debug, Deserialize)]
pub struct CreateZoneRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateZoneRequest {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ZoneResponse {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub description: Option<String>,
}

// -- Contacts --

#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub phone: String,
    pub relationship: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
}

/// Contact as returned by the API — `phone` is already normalized to the
/// canonical international form.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

// -- Emergency history --

#[derive(Debug, Deserialize)]
pub struct UpdateEmergencyStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct EmergencyResponse {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    pub status: String,
    pub description: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

// -- Emergency services directory --

#[derive(Debug, Clone, Serialize)]
pub struct EmergencyService {
    pub name: &'static str,
    pub number: &'static str,
    pub description: &'static str,
}
