use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::messages;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    #[serde(default)]
    pub anonymous: bool,
    #[serde(rename = "type")]
    pub token_type: Option<String>, // "access" or "refresh"
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub is_anonymous: bool,
}

pub fn generate_tokens(
    user_id: Uuid,
    anonymous: bool,
    jwt: &JwtConfig,
) -> AppResult<(String, String)> {
    let now = Utc::now().timestamp();
    let key = EncodingKey::from_secret(jwt.secret.as_bytes());

    let access_claims = Claims {
        sub: user_id.to_string(),
        anonymous,
        token_type: Some("access".to_string()),
        exp: now + jwt.access_expiry_secs,
        iat: now,
    };
    let access_token = encode(&Header::default(), &access_claims, &key)?;

    let refresh_claims = Claims {
        token_type: Some("refresh".to_string()),
        exp: now + jwt.refresh_expiry_secs,
        ..access_claims
    };
    let refresh_token = encode(&Header::default(), &refresh_claims, &key)?;

    Ok((access_token, refresh_token))
}

pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

fn extract_bearer(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

fn auth_user(claims: Claims) -> Option<AuthUser> {
    if claims.token_type.as_deref() == Some("refresh") {
        return None;
    }
    let id = Uuid::parse_str(&claims.sub).ok()?;
    Some(AuthUser {
        id,
        is_anonymous: claims.anonymous,
    })
}

fn login_required() -> AppError {
    AppError::Unauthorized(messages::store_message("unauthenticated", ""))
}

/// Middleware: requires a valid access token (anonymous ones included).
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(&req).ok_or_else(login_required)?;
    let claims = verify_token(&token, &state.config.jwt.secret)?;
    let user = auth_user(claims).ok_or_else(login_required)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Middleware: sets AuthUser when a usable token is present, never rejects.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(user) = extract_bearer(&req)
        .and_then(|token| verify_token(&token, &state.config.jwt.secret).ok())
        .and_then(auth_user)
    {
        req.extensions_mut().insert(user);
    }
    Ok(next.run(req).await)
}
