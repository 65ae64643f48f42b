#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // For `oneshot` method

use game_store_api::cache::Cache;
use game_store_api::config::*;
use game_store_api::services::location::{LocationStamper, NoopGeocoder};
use game_store_api::services::retry::RetryPolicy;
use game_store_api::store::MemoryStore;
use game_store_api::{build_router, AppState};

pub fn test_config() -> Config {
    Config {
        port: 0,
        cors_origins: vec!["*".into()],
        store: StoreBackend::Memory,
        db: DbConfig {
            host: "localhost".into(),
            port: 5432,
            database: "game_store_test".into(),
            user: "game_store".into(),
            password: String::new(),
            pool_min: 1,
            pool_max: 1,
        },
        redis: RedisConfig {
            enabled: false,
            host: "localhost".into(),
            port: 6379,
            password: None,
            db: 0,
            key_prefix: "store:".into(),
            games_ttl_secs: 30,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_for_testing_only".into(),
            access_expiry_secs: 3600,
            refresh_expiry_secs: 86400,
            bcrypt_cost: 4,
        },
        rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests: 1000,
            topup_max: 5,
        },
        retry: RetryPolicy {
            max_attempts: 3,
            timeout: Duration::from_secs(2),
            backoff: Duration::from_millis(1),
        },
        connectivity: ConnectivityConfig {
            poll_interval: Duration::from_secs(30),
            ping_timeout: Duration::from_secs(1),
        },
        geocoder: GeocoderConfig {
            url: None,
            timeout: Duration::from_secs(1),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(
            Arc::new(store.clone()),
            Cache::disabled(),
            test_config(),
            LocationStamper::new(Arc::new(NoopGeocoder)),
        );
        Self {
            router: build_router(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", uri, token, None).await
    }

    /// Signs in anonymously and returns the access token.
    pub async fn anonymous_token(&self) -> String {
        let (status, body) = self
            .request("POST", "/api/v1/auth/anonymous", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a game and returns its id.
    pub async fn create_game(&self, token: Option<&str>, body: Value) -> String {
        let (status, resp) = self.post("/api/v1/games", token, body).await;
        assert_eq!(status, StatusCode::CREATED, "{resp}");
        resp["id"].as_str().unwrap().to_string()
    }
}

pub fn game_body(name: &str, category: &str) -> Value {
    serde_json::json!({
        "gameName": name,
        "gameIcon": format!("https://cdn.example.com/{}.png", name.to_lowercase().replace(' ', "-")),
        "category": category,
        "topupOptions": [
            { "name": "86 Diamonds", "price": 20000, "bonus": "+8 Bonus" },
            { "name": "172 Diamonds", "price": 40000, "isPopular": true }
        ],
        "isPopular": false,
        "isFeatured": false
    })
}
