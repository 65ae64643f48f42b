//! Document storage for the three collections: games, transactions and users.
//!
//! Handlers only see the repository traits; `PgStore` backs production and
//! `MemoryStore` backs local development and the test suite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

use crate::models::{Game, Location, Transaction, TransactionStatus, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Operation timeout after {0:?}")]
    Timeout(Duration),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Already exists: {0}")]
    Conflict(String),
}

impl StoreError {
    /// Document-store style error code, used for message classification.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Database(e) => match e {
                sqlx::Error::Io(_) | sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
                    "unavailable"
                }
                sqlx::Error::PoolTimedOut => "deadline-exceeded",
                sqlx::Error::RowNotFound => "not-found",
                sqlx::Error::Database(db) => match db.code().as_deref() {
                    Some("23505") => "already-exists",
                    Some("42501") => "permission-denied",
                    Some("53300") => "resource-exhausted",
                    Some("40001") | Some("40P01") => "aborted",
                    _ => "internal",
                },
                _ => "internal",
            },
            StoreError::Timeout(_) => "deadline-exceeded",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Conflict(_) => "already-exists",
        }
    }

    /// Network-class failures worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self.code() {
            "unavailable" | "deadline-exceeded" => true,
            _ => {
                let msg = self.to_string().to_lowercase();
                msg.contains("transport") || msg.contains("timeout") || msg.contains("network")
            }
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Every game, unfiltered and unsorted.
    async fn list_games(&self) -> StoreResult<Vec<Game>>;

    async fn find_game(&self, id: Uuid) -> StoreResult<Option<Game>>;

    async fn insert_game(&self, game: &Game) -> StoreResult<()>;

    /// Overwrites the stored document. Returns false if it no longer exists.
    async fn replace_game(&self, game: &Game) -> StoreResult<bool>;

    async fn delete_game(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn insert_transaction(&self, tx: &Transaction) -> StoreResult<()>;

    async fn find_transaction(&self, id: Uuid) -> StoreResult<Option<Transaction>>;

    async fn list_transactions_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>>;

    async fn update_transaction_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn record_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        location: Option<&Location>,
    ) -> StoreResult<()>;

    async fn set_last_location(&self, id: Uuid, location: &Location) -> StoreResult<bool>;

    /// Set semantics; returns the resulting favorites, or None for an unknown user.
    async fn add_favorite(&self, id: Uuid, game_id: Uuid) -> StoreResult<Option<Vec<Uuid>>>;

    async fn remove_favorite(&self, id: Uuid, game_id: Uuid) -> StoreResult<Option<Vec<Uuid>>>;
}

#[async_trait]
pub trait Store: GameRepository + TransactionRepository + UserRepository {
    /// Cheap round trip used by health checks and the connectivity monitor.
    async fn ping(&self) -> StoreResult<()>;

    fn backend(&self) -> &'static str;
}
