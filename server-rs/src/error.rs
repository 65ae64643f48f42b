use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::messages;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Store offline")]
    Offline,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Offline => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(e) => match e.code() {
                "unavailable" | "deadline-exceeded" => StatusCode::SERVICE_UNAVAILABLE,
                "permission-denied" => StatusCode::FORBIDDEN,
                "already-exists" => StatusCode::CONFLICT,
                "not-found" => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::RateLimited => "Terlalu banyak permintaan. Coba lagi nanti".to_string(),
            AppError::Offline => {
                "Tidak Ada Koneksi. Pastikan Anda terhubung ke internet untuk melakukan topup."
                    .to_string()
            }
            AppError::Store(e) => {
                tracing::error!(code = e.code(), "Store error: {e}");
                messages::store_message(e.code(), &e.to_string())
            }
            AppError::Jwt(_) => messages::store_message("unauthenticated", ""),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Kesalahan internal server".to_string()
            }
        };

        let body = json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
