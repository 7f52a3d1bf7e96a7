use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use lifeline_types::api::{
    Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};

use crate::AppState;
use crate::error::ApiError;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(ApiError::invalid("Username must be 3-32 characters"));
    }
    if req.password.len() < 8 {
        return Err(ApiError::invalid("Password must be at least 8 characters"));
    }
    if !req.email.contains('@') {
        return Err(ApiError::invalid("Invalid email address"));
    }

    // Username and email are both unique
    if state.db.get_user_by_username(&req.username)?.is_some() {
        return Err(ApiError::Conflict("Username already exists"));
    }
    if state.db.get_user_by_email(&req.email)?.is_some() {
        return Err(ApiError::Conflict("Email already registered"));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|_| ApiError::Internal)?
        .to_string();

    let user_id = Uuid::new_v4();

    state.db.create_user(
        &user_id.to_string(),
        &req.username,
        &req.email,
        &password_hash,
        req.phone.as_deref(),
    )?;

    let token = create_token(&state.jwt_secret, user_id, &req.username)
        .map_err(|_| ApiError::Internal)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id, token }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_username(&req.username)?
        .ok_or(ApiError::Unauthorized)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password).map_err(|_| ApiError::Internal)?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let user_id: Uuid = user.id.parse().map_err(|_| ApiError::Internal)?;

    let token =
        create_token(&state.jwt_secret, user_id, &user.username).map_err(|_| ApiError::Internal)?;

    Ok(Json(LoginResponse {
        user_id,
        username: user.username,
        token,
    }))
}

fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
