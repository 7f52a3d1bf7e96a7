use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use lifeline_alerts::phone::normalize_for_storage;
use lifeline_db::models::ContactRow;
use lifeline_types::api::{Claims, ContactResponse, CreateContactRequest, UpdateContactRequest};

use crate::AppState;
use crate::error::ApiError;

fn to_response(row: ContactRow, country_code: &str) -> ContactResponse {
    ContactResponse {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt contact id '{}': {}", row.id, e);
            Uuid::default()
        }),
        name: row.name,
        phone: normalize_for_storage(&row.phone, country_code),
        relationship: row.relationship,
    }
}

pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_contacts(&claims.sub.to_string())?;
    let contacts: Vec<ContactResponse> = rows
        .into_iter()
        .map(|row| to_response(row, &state.country_code))
        .collect();
    Ok(Json(contacts))
}

pub async fn create_contact(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::invalid("Contact name is required"));
    }
    if req.phone.trim().is_empty() {
        return Err(ApiError::invalid("Contact phone is required"));
    }

    let id = Uuid::new_v4();
    state.db.insert_contact(
        &id.to_string(),
        &claims.sub.to_string(),
        &req.name,
        &req.phone,
        req.relationship.as_deref().unwrap_or(""),
    )?;

    let row = state
        .db
        .get_contact(&id.to_string(), &claims.sub.to_string())?
        .ok_or(ApiError::Internal)?;

    Ok((
        StatusCode::CREATED,
        Json(to_response(row, &state.country_code)),
    ))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(contact_id): Path<Uuid>,
    Json(req): Json<UpdateContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.sub.to_string();
    let mut row = state
        .db
        .get_contact(&contact_id.to_string(), &user_id)?
        .ok_or(ApiError::NotFound("Contact"))?;

    if let Some(name) = req.name {
        row.name = name;
    }
    if let Some(phone) = req.phone {
        row.phone = phone;
    }
    if let Some(relationship) = req.relationship {
        row.relationship = relationship;
    }

    state.db.update_contact(&row)?;
    Ok(Json(to_response(row, &state.country_code)))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(contact_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .delete_contact(&contact_id.to_string(), &claims.sub.to_string())
        .map_err(|e| match e {
            lifeline_db::StoreError::NotFound => ApiError::NotFound("Contact"),
            other => other.into(),
        })?;
    Ok(Json(serde_json::json!({ "message": "Contact deleted successfully" })))
}
