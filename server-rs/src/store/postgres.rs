use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::*;
use crate::models::{GameCategory, PaymentMethod, TopupOption};

/// Games keep their topup options and location as JSONB so each game stays a
/// single document, replaced wholesale on update.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct GameRow {
    id: Uuid,
    game_name: String,
    game_icon: String,
    category: String,
    topup_options: Json<Vec<TopupOption>>,
    is_popular: bool,
    is_featured: bool,
    user_id: Option<Uuid>,
    location: Option<Json<Location>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GameRow> for Game {
    fn from(r: GameRow) -> Self {
        Self {
            id: r.id,
            game_name: r.game_name,
            game_icon: r.game_icon,
            category: GameCategory::from_stored(&r.category),
            topup_options: r.topup_options.0,
            is_popular: r.is_popular,
            is_featured: r.is_featured,
            user_id: r.user_id,
            location: r.location.map(|l| l.0),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    game_id: Uuid,
    topup_option_id: String,
    amount: i64,
    status: String,
    payment_method: String,
    user_game_id: String,
    location: Option<Json<Location>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TransactionRow> for Transaction {
    fn from(r: TransactionRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            game_id: r.game_id,
            topup_option_id: r.topup_option_id,
            amount: r.amount,
            status: TransactionStatus::from_stored(&r.status),
            payment_method: PaymentMethod::from_stored(&r.payment_method),
            user_game_id: r.user_game_id,
            location: r.location.map(|l| l.0),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: Option<String>,
    password_hash: Option<String>,
    is_anonymous: bool,
    favorite_games: Vec<Uuid>,
    last_location: Option<Json<Location>>,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            password_hash: r.password_hash,
            is_anonymous: r.is_anonymous,
            favorite_games: r.favorite_games,
            last_location: r.last_location.map(|l| l.0),
            created_at: r.created_at,
            last_login_at: r.last_login_at,
        }
    }
}

#[async_trait]
impl GameRepository for PgStore {
    async fn list_games(&self) -> StoreResult<Vec<Game>> {
        let rows: Vec<GameRow> = sqlx::query_as("SELECT * FROM games")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Game::from).collect())
    }

    async fn find_game(&self, id: Uuid) -> StoreResult<Option<Game>> {
        let row: Option<GameRow> = sqlx::query_as("SELECT * FROM games WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Game::from))
    }

    async fn insert_game(&self, game: &Game) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO games (id, game_name, game_icon, category, topup_options, is_popular, is_featured, user_id, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(game.id)
        .bind(&game.game_name)
        .bind(&game.game_icon)
        .bind(game.category.as_str())
        .bind(Json(&game.topup_options))
        .bind(game.is_popular)
        .bind(game.is_featured)
        .bind(game.user_id)
        .bind(game.location.as_ref().map(Json))
        .bind(game.created_at)
        .bind(game.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_game(&self, game: &Game) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"UPDATE games SET game_name = $2, game_icon = $3, category = $4, topup_options = $5,
                is_popular = $6, is_featured = $7, location = $8, updated_at = $9
            WHERE id = $1"#,
        )
        .bind(game.id)
        .bind(&game.game_name)
        .bind(&game.game_icon)
        .bind(game.category.as_str())
        .bind(Json(&game.topup_options))
        .bind(game.is_popular)
        .bind(game.is_featured)
        .bind(game.location.as_ref().map(Json))
        .bind(game.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_game(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TransactionRepository for PgStore {
    async fn insert_transaction(&self, tx: &Transaction) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO transactions (id, user_id, game_id, topup_option_id, amount, status, payment_method, user_game_id, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(tx.id)
        .bind(tx.user_id)
        .bind(tx.game_id)
        .bind(&tx.topup_option_id)
        .bind(tx.amount)
        .bind(tx.status.as_str())
        .bind(tx.payment_method.as_str())
        .bind(&tx.user_game_id)
        .bind(tx.location.as_ref().map(Json))
        .bind(tx.created_at)
        .bind(tx.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_transaction(&self, id: Uuid) -> StoreResult<Option<Transaction>> {
        let row: Option<TransactionRow> =
            sqlx::query_as("SELECT * FROM transactions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Transaction::from))
    }

    async fn list_transactions_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> =
            sqlx::query_as("SELECT * FROM transactions WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    async fn update_transaction_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE transactions SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(status.as_str())
                .bind(updated_at)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, username, email, password_hash, is_anonymous, favorite_games, last_location, created_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_anonymous)
        .bind(&user.favorite_games)
        .bind(user.last_location.as_ref().map(Json))
        .bind(user.created_at)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => Err(
                StoreError::Conflict(user.email.clone().unwrap_or_else(|| user.id.to_string())),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn record_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        location: Option<&Location>,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE users SET last_login_at = $2, last_location = COALESCE($3, last_location) WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .bind(location.map(Json))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_last_location(&self, id: Uuid, location: &Location) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET last_location = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(location))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_favorite(&self, id: Uuid, game_id: Uuid) -> StoreResult<Option<Vec<Uuid>>> {
        let favs: Option<Vec<Uuid>> = sqlx::query_scalar(
            r#"UPDATE users SET favorite_games = CASE
                WHEN $2 = ANY(favorite_games) THEN favorite_games
                ELSE array_append(favorite_games, $2)
            END
            WHERE id = $1
            RETURNING favorite_games"#,
        )
        .bind(id)
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favs)
    }

    async fn remove_favorite(&self, id: Uuid, game_id: Uuid) -> StoreResult<Option<Vec<Uuid>>> {
        let favs: Option<Vec<Uuid>> = sqlx::query_scalar(
            "UPDATE users SET favorite_games = array_remove(favorite_games, $2) WHERE id = $1 RETURNING favorite_games",
        )
        .bind(id)
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favs)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
