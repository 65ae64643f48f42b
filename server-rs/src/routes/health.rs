use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store_ok = state.connectivity.check(state.store.as_ref()).await;
    let redis_ok = state.cache.health_check().await;

    let status = if store_ok && redis_ok != Some(false) {
        "healthy"
    } else {
        "degraded"
    };
    Json(json!({
        "status": status,
        "store": state.store.backend(),
        "online": store_ok,
        "redis": redis_ok,
        "timestamp": chrono::Utc::now(),
    }))
}
