use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::models::{CreateGameRequest, Game, GameCategory, Location, UpdateGameRequest};
use crate::services::catalog::{self, GameFilter};
use crate::services::location::{distance_km, format_location};
use crate::services::retry::{retry_operation, with_timeout};
use crate::AppState;

const GAMES_VERSION_KEY: &str = "games:version";

fn games_cache_key(version: u64) -> String {
    format!("games:all:{version}")
}

#[derive(Debug, Deserialize)]
pub struct GameQuery {
    pub category: Option<String>,
    pub popular: Option<bool>,
    pub featured: Option<bool>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn parse_category(raw: &str) -> AppResult<GameCategory> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Kategori game tidak valid".into()))
}

fn parse_game_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Game tidak ditemukan".into()))
}

/// Unfiltered listing, read through the cache. Entries are keyed by the
/// listing version read before the store, so a fill racing a write lands
/// under a version the write has already retired.
async fn fetch_games(state: &AppState) -> AppResult<Vec<Game>> {
    let key = state
        .cache
        .get_counter(GAMES_VERSION_KEY)
        .await
        .map(games_cache_key);
    if let Some(key) = &key {
        if let Some(games) = state.cache.get_json::<Vec<Game>>(key).await {
            return Ok(games);
        }
    }
    let games = retry_operation(&state.config.retry, || state.store.list_games()).await?;
    if let Some(key) = &key {
        state
            .cache
            .set_json(key, &games, state.config.redis.games_ttl_secs)
            .await;
    }
    Ok(games)
}

async fn invalidate(state: &AppState) {
    state.cache.bump(GAMES_VERSION_KEY).await;
}

pub async fn list_games(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<GameQuery>,
) -> AppResult<Json<Value>> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(parse_category)
        .transpose()?;
    let filter = GameFilter {
        category,
        popular: query.popular,
        featured: query.featured,
        search: query.q,
    };

    let games = catalog::apply(fetch_games(&state).await?, &filter);
    Ok(Json(json!({ "games": games })))
}

pub async fn featured_games(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let games = catalog::featured(fetch_games(&state).await?);
    Ok(Json(json!({ "games": games })))
}

pub async fn popular_games(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let games = catalog::popular(fetch_games(&state).await?);
    Ok(Json(json!({ "games": games })))
}

pub async fn games_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<Value>> {
    let category = parse_category(&category)?;
    let games = catalog::by_category(fetch_games(&state).await?, category);
    Ok(Json(json!({ "category": category, "games": games })))
}

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let games = fetch_games(&state).await?;
    Ok(Json(json!({ "categories": catalog::category_summaries(&games) })))
}

/// Single game. A signed-in caller with a known last location also gets
/// `distanceKm` to the game's location.
pub async fn get_game(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_game_id(&id)?;
    let game = retry_operation(&state.config.retry, || state.store.find_game(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Game tidak ditemukan".into()))?;

    let caller_location = match (&user, &game.location) {
        (Some(Extension(user)), Some(_)) => {
            retry_operation(&state.config.retry, || state.store.find_user(user.id))
                .await?
                .and_then(|u| u.last_location)
        }
        _ => None,
    };

    let distance = caller_location
        .zip(game.location.as_ref())
        .map(|(from, to)| distance_km(&from, to));

    let mut body = json!({ "game": game });
    if let Some(km) = distance {
        body["distanceKm"] = json!(km);
    }
    Ok(Json(body))
}

pub async fn create_game(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    AppJson(body): AppJson<CreateGameRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let owner = user.as_ref().map(|Extension(u)| u.id);
    let anonymous = user.as_ref().map(|Extension(u)| u.is_anonymous);
    let fix = body.location.clone();
    let mut game = body
        .into_game(owner, Utc::now())
        .map_err(AppError::BadRequest)?;
    game.location = state.locator.stamp(fix).await?;

    with_timeout(state.config.retry.timeout, state.store.insert_game(&game)).await?;
    invalidate(&state).await;

    tracing::info!(
        game_id = %game.id,
        owner = ?owner,
        caller_anonymous = ?anonymous,
        category = %game.category,
        options = game.topup_options.len(),
        "Game created"
    );
    Ok((StatusCode::CREATED, Json(json!({ "id": game.id, "game": game }))))
}

pub async fn update_game(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateGameRequest>,
) -> AppResult<Json<Value>> {
    let id = parse_game_id(&id)?;
    let mut game = retry_operation(&state.config.retry, || state.store.find_game(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Game tidak ditemukan".into()))?;

    let fix = body.location.clone();
    body.apply(&mut game, Utc::now())
        .map_err(AppError::BadRequest)?;
    if let Some(location) = state.locator.stamp(fix).await? {
        game.location = Some(location);
    }

    let replaced = retry_operation(&state.config.retry, || state.store.replace_game(&game)).await?;
    if !replaced {
        return Err(AppError::NotFound("Game tidak ditemukan".into()));
    }
    invalidate(&state).await;

    tracing::info!(
        game_id = %game.id,
        caller = ?user.as_ref().map(|Extension(u)| u.id),
        caller_anonymous = ?user.as_ref().map(|Extension(u)| u.is_anonymous),
        "Game updated"
    );
    Ok(Json(json!({ "game": game })))
}

pub async fn delete_game(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    AppQuery(query): AppQuery<DeleteQuery>,
) -> AppResult<Json<Value>> {
    let id = parse_game_id(&id)?;
    let fix = match (query.latitude, query.longitude) {
        (Some(lat), Some(lon)) => Some(Location::new(lat, lon)),
        _ => None,
    };
    let location = state.locator.stamp(fix).await?;

    let deleted = retry_operation(&state.config.retry, || state.store.delete_game(id)).await?;
    if !deleted {
        return Err(AppError::NotFound("Game tidak ditemukan".into()));
    }
    invalidate(&state).await;

    tracing::info!(
        game_id = %id,
        caller = ?user.as_ref().map(|Extension(u)| u.id),
        caller_anonymous = ?user.as_ref().map(|Extension(u)| u.is_anonymous),
        location = location.as_ref().map(format_location).unwrap_or_default(),
        "Game deleted"
    );
    Ok(Json(json!({ "success": true })))
}
