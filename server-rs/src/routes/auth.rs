use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::messages::{self, AuthFailure};
use crate::middleware::auth::{generate_tokens, verify_token};
use crate::models::user::*;
use crate::services::location::distance_km;
use crate::services::retry::{retry_operation, with_timeout};
use crate::AppState;

async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(messages::generic_message(&e.to_string(), "registrasi")))
}

async fn check_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(messages::generic_message(&e.to_string(), "login")))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn token_response(user: &User, state: &AppState) -> AppResult<Json<Value>> {
    let (token, refresh_token) = generate_tokens(user.id, user.is_anonymous, &state.config.jwt)?;
    Ok(Json(json!({
        "token": token,
        "refreshToken": refresh_token,
        "user": UserPublic::from(user),
    })))
}

pub async fn anonymous(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        username: String::new(),
        email: None,
        password_hash: None,
        is_anonymous: true,
        favorite_games: Vec::new(),
        last_location: None,
        created_at: now,
        last_login_at: Some(now),
    };
    with_timeout(state.config.retry.timeout, state.store.insert_user(&user)).await?;

    tracing::info!(user_id = %user.id, "Anonymous sign-in");
    token_response(&user, &state)
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let username = body.username.trim().to_string();
    let email = normalize_email(&body.email);

    if username.is_empty()
        || email.is_empty()
        || body.password.is_empty()
        || body.confirm_password.is_empty()
    {
        return Err(AppError::BadRequest("Semua field harus diisi".into()));
    }
    if body.password.chars().count() < 6 {
        return Err(AppError::BadRequest("Password minimal 6 karakter".into()));
    }
    if body.password != body.confirm_password {
        return Err(AppError::BadRequest("Password tidak cocok".into()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Email tidak valid".into()));
    }

    let existing = retry_operation(&state.config.retry, || {
        state.store.find_user_by_email(&email)
    })
    .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(AuthFailure::EmailAlreadyInUse.message()));
    }

    let password_hash = hash_password(body.password, state.config.jwt.bcrypt_cost).await?;
    let user = User {
        id: Uuid::new_v4(),
        username,
        email: Some(email),
        password_hash: Some(password_hash),
        is_anonymous: false,
        favorite_games: Vec::new(),
        last_location: None,
        created_at: Utc::now(),
        last_login_at: None,
    };

    match with_timeout(state.config.retry.timeout, state.store.insert_user(&user)).await {
        Ok(()) => {}
        Err(e) if e.code() == "already-exists" => {
            return Err(AppError::Conflict(AuthFailure::EmailAlreadyInUse.message()));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registrasi berhasil. Silakan login",
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<Value>> {
    let email = normalize_email(&body.email);
    if email.is_empty() || body.password.trim().is_empty() {
        return Err(AppError::BadRequest("Email dan password harus diisi".into()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Email tidak valid".into()));
    }

    let invalid = || AppError::Unauthorized(AuthFailure::InvalidCredential.message());

    let mut user = retry_operation(&state.config.retry, || {
        state.store.find_user_by_email(&email)
    })
    .await?
    .ok_or_else(invalid)?;

    let hash = user.password_hash.clone().ok_or_else(invalid)?;
    if !check_password(body.password, hash).await? {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(invalid());
    }

    let location = state.locator.stamp(body.location).await?;
    let now = Utc::now();
    retry_operation(&state.config.retry, || {
        state.store.record_login(user.id, now, location.as_ref())
    })
    .await?;

    user.last_login_at = Some(now);
    if let Some(location) = location {
        if let Some(previous) = &user.last_location {
            tracing::debug!(
                user_id = %user.id,
                moved_km = distance_km(previous, &location),
                "Login location changed"
            );
        }
        user.last_location = Some(location);
    }

    tracing::info!(user_id = %user.id, "User logged in");
    token_response(&user, &state)
}

pub async fn refresh(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> AppResult<Json<Value>> {
    let token = body["refreshToken"]
        .as_str()
        .ok_or_else(|| AppError::BadRequest("refreshToken harus diisi".into()))?;

    let claims = verify_token(token, &state.config.jwt.secret)?;
    if claims.token_type.as_deref() != Some("refresh") {
        return Err(AppError::Unauthorized(messages::store_message("unauthenticated", "")));
    }

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized(messages::store_message("unauthenticated", "")))?;
    let user = retry_operation(&state.config.retry, || state.store.find_user(user_id))
        .await?
        .ok_or_else(|| AppError::Unauthorized(AuthFailure::UserNotFound.message()))?;

    let (token, refresh_token) = generate_tokens(user.id, user.is_anonymous, &state.config.jwt)?;
    Ok(Json(json!({
        "token": token,
        "refreshToken": refresh_token,
    })))
}
