use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::*;

/// In-process store. Cloning shares the underlying collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    games: Arc<RwLock<HashMap<Uuid, Game>>>,
    transactions: Arc<RwLock<HashMap<Uuid, Transaction>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates losing (or regaining) the connection to the backend.
    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl GameRepository for MemoryStore {
    async fn list_games(&self) -> StoreResult<Vec<Game>> {
        self.check()?;
        Ok(self.games.read().await.values().cloned().collect())
    }

    async fn find_game(&self, id: Uuid) -> StoreResult<Option<Game>> {
        self.check()?;
        Ok(self.games.read().await.get(&id).cloned())
    }

    async fn insert_game(&self, game: &Game) -> StoreResult<()> {
        self.check()?;
        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            return Err(StoreError::Conflict(format!("game {}", game.id)));
        }
        games.insert(game.id, game.clone());
        Ok(())
    }

    async fn replace_game(&self, game: &Game) -> StoreResult<bool> {
        self.check()?;
        let mut games = self.games.write().await;
        match games.get_mut(&game.id) {
            Some(existing) => {
                *existing = game.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_game(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        Ok(self.games.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn insert_transaction(&self, tx: &Transaction) -> StoreResult<()> {
        self.check()?;
        let mut txs = self.transactions.write().await;
        if txs.contains_key(&tx.id) {
            return Err(StoreError::Conflict(format!("transaction {}", tx.id)));
        }
        txs.insert(tx.id, tx.clone());
        Ok(())
    }

    async fn find_transaction(&self, id: Uuid) -> StoreResult<Option<Transaction>> {
        self.check()?;
        Ok(self.transactions.read().await.get(&id).cloned())
    }

    async fn list_transactions_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>> {
        self.check()?;
        Ok(self
            .transactions
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_transaction_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        self.check()?;
        let mut txs = self.transactions.write().await;
        match txs.get_mut(&id) {
            Some(tx) => {
                tx.status = status;
                tx.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.check()?;
        let mut users = self.users.write().await;
        if let Some(email) = &user.email {
            if users.values().any(|u| u.email.as_ref() == Some(email)) {
                return Err(StoreError::Conflict(format!("email {email}")));
            }
        }
        if users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user {}", user.id)));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.check()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.check()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn record_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        location: Option<&Location>,
    ) -> StoreResult<()> {
        self.check()?;
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.last_login_at = Some(at);
            if let Some(loc) = location {
                user.last_location = Some(loc.clone());
            }
        }
        Ok(())
    }

    async fn set_last_location(&self, id: Uuid, location: &Location) -> StoreResult<bool> {
        self.check()?;
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.last_location = Some(location.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_favorite(&self, id: Uuid, game_id: Uuid) -> StoreResult<Option<Vec<Uuid>>> {
        self.check()?;
        Ok(self.users.write().await.get_mut(&id).map(|user| {
            if !user.favorite_games.contains(&game_id) {
                user.favorite_games.push(game_id);
            }
            user.favorite_games.clone()
        }))
    }

    async fn remove_favorite(&self, id: Uuid, game_id: Uuid) -> StoreResult<Option<Vec<Uuid>>> {
        self.check()?;
        Ok(self.users.write().await.get_mut(&id).map(|user| {
            user.favorite_games.retain(|g| *g != game_id);
            user.favorite_games.clone()
        }))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
