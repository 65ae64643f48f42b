use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::localization::{format_amount, LocaleInfo};
use crate::models::{
    CreateTransactionRequest, PaymentMethod, Transaction, TransactionStatus, UpdateStatusRequest,
};
use crate::services::catalog;
use crate::services::retry::{retry_operation, with_timeout};
use crate::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Transaksi tidak ditemukan".into())
}

/// Loads a transaction owned by `user`; other users' records read as missing.
async fn owned_transaction(state: &AppState, user: &AuthUser, raw_id: &str) -> AppResult<Transaction> {
    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    retry_operation(&state.config.retry, || state.store.find_transaction(id))
        .await?
        .filter(|tx| tx.user_id == user.id)
        .ok_or_else(not_found)
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateTransactionRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let user_game_id = body
        .user_game_id
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if user_game_id.is_empty() {
        return Err(AppError::BadRequest("Game ID harus diisi".into()));
    }
    let payment_method: PaymentMethod = body
        .payment_method
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Pilih metode pembayaran".into()))?
        .parse()
        .map_err(|_| AppError::BadRequest("Metode pembayaran tidak valid".into()))?;

    if !state.connectivity.check(state.store.as_ref()).await {
        tracing::warn!(user_id = %user.id, "Top-up refused while store is offline");
        return Err(AppError::Offline);
    }

    let game_id = Uuid::parse_str(body.game_id.trim())
        .map_err(|_| AppError::NotFound("Game tidak ditemukan".into()))?;
    let game = retry_operation(&state.config.retry, || state.store.find_game(game_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Game tidak ditemukan".into()))?;
    let option = game
        .find_option(body.topup_option_id.trim())
        .ok_or_else(|| AppError::NotFound("Opsi topup tidak ditemukan".into()))?;

    let location = state.locator.stamp(body.location).await?;
    let now = Utc::now();
    let tx = Transaction {
        id: Uuid::new_v4(),
        user_id: user.id,
        game_id: game.id,
        topup_option_id: option.id.clone(),
        amount: option.price,
        status: TransactionStatus::Pending,
        payment_method,
        user_game_id,
        location,
        created_at: now,
        updated_at: now,
    };

    with_timeout(state.config.retry.timeout, state.store.insert_transaction(&tx)).await?;

    tracing::info!(
        transaction_id = %tx.id,
        user_id = %user.id,
        game_id = %game.id,
        amount = tx.amount,
        method = payment_method.as_str(),
        "Transaction created"
    );
    Ok((StatusCode::CREATED, Json(json!({ "id": tx.id, "transaction": tx }))))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let mut txs = retry_operation(&state.config.retry, || {
        state.store.list_transactions_for_user(user.id)
    })
    .await?;
    catalog::sort_transactions(&mut txs);
    Ok(Json(json!({ "transactions": txs })))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    locale: Option<Extension<LocaleInfo>>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let tx = owned_transaction(&state, &user, &id).await?;
    let locale = locale.map(|Extension(l)| l).unwrap_or_default();
    let amount = format_amount(tx.amount, &locale);

    Ok(Json(json!({
        "transaction": tx,
        "paymentMethod": {
            "id": tx.payment_method,
            "name": tx.payment_method.display_name(),
        },
        "formattedAmount": amount,
        "instructions": tx.payment_method.instructions(&amount),
    })))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateStatusRequest>,
) -> AppResult<Json<Value>> {
    let tx = owned_transaction(&state, &user, &id).await?;
    let now = Utc::now();

    let updated = retry_operation(&state.config.retry, || {
        state.store.update_transaction_status(tx.id, body.status, now)
    })
    .await?;
    if !updated {
        return Err(not_found());
    }

    tracing::info!(
        transaction_id = %tx.id,
        from = tx.status.as_str(),
        to = body.status.as_str(),
        "Transaction status updated"
    );
    Ok(Json(json!({ "success": true, "status": body.status })))
}

pub async fn payment_methods() -> Json<Value> {
    let methods: Vec<Value> = PaymentMethod::ALL
        .iter()
        .map(|m| json!({ "id": m, "name": m.display_name() }))
        .collect();
    Json(json!({ "paymentMethods": methods }))
}
