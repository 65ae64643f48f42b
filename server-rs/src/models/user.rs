use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::Location;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_anonymous: bool,
    pub favorite_games: Vec<Uuid>,
    pub last_location: Option<Location>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "confirmPassword", default)]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub location: Option<Location>,
}

/// Session projection handed to clients; not the stored identity record.
#[derive(Debug, Serialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    #[serde(rename = "isAnonymous")]
    pub is_anonymous: bool,
    #[serde(rename = "favoriteGames")]
    pub favorite_games: Vec<Uuid>,
    #[serde(rename = "lastLocation")]
    pub last_location: Option<Location>,
}

impl From<&User> for UserPublic {
    fn from(u: &User) -> Self {
        let username = if u.username.trim().is_empty() {
            u.email
                .as_deref()
                .and_then(|e| e.split('@').next())
                .unwrap_or_default()
                .to_string()
        } else {
            u.username.clone()
        };
        Self {
            id: u.id,
            username,
            email: u.email.clone(),
            is_anonymous: u.is_anonymous,
            favorite_games: u.favorite_games.clone(),
            last_location: u.last_location.clone(),
        }
    }
}
