use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::messages::AuthFailure;
use crate::middleware::auth::AuthUser;
use crate::models::{LocationUpdateRequest, User, UserPublic};
use crate::services::retry::retry_operation;
use crate::AppState;

async fn load_user(state: &AppState, id: Uuid) -> AppResult<User> {
    retry_operation(&state.config.retry, || state.store.find_user(id))
        .await?
        .ok_or_else(|| AppError::NotFound(AuthFailure::UserNotFound.message()))
}

fn parse_game_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Game tidak ditemukan".into()))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let user = load_user(&state, user.id).await?;
    Ok(Json(json!({ "user": UserPublic::from(&user) })))
}

pub async fn update_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<LocationUpdateRequest>,
) -> AppResult<Json<Value>> {
    let location = state
        .locator
        .stamp(body.location)
        .await?
        .ok_or_else(|| AppError::BadRequest("Lokasi harus diisi".into()))?;

    let updated = retry_operation(&state.config.retry, || {
        state.store.set_last_location(user.id, &location)
    })
    .await?;
    if !updated {
        return Err(AppError::NotFound(AuthFailure::UserNotFound.message()));
    }

    tracing::debug!(user_id = %user.id, "Last location updated");
    Ok(Json(json!({ "lastLocation": location })))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(game_id): Path<String>,
) -> AppResult<Json<Value>> {
    let game_id = parse_game_id(&game_id)?;
    retry_operation(&state.config.retry, || state.store.find_game(game_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Game tidak ditemukan".into()))?;

    let favorites = retry_operation(&state.config.retry, || {
        state.store.add_favorite(user.id, game_id)
    })
    .await?
    .ok_or_else(|| AppError::NotFound(AuthFailure::UserNotFound.message()))?;
    Ok(Json(json!({ "favoriteGames": favorites })))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(game_id): Path<String>,
) -> AppResult<Json<Value>> {
    let game_id = parse_game_id(&game_id)?;
    let favorites = retry_operation(&state.config.retry, || {
        state.store.remove_favorite(user.id, game_id)
    })
    .await?
    .ok_or_else(|| AppError::NotFound(AuthFailure::UserNotFound.message()))?;
    Ok(Json(json!({ "favoriteGames": favorites })))
}
