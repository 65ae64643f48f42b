use axum::{
    http::HeaderValue,
    middleware as axum_mw,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod messages;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use cache::Cache;
use config::Config;
use middleware::rate_limit::RateLimiter;
use services::connectivity::ConnectivityMonitor;
use services::location::LocationStamper;
use store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub cache: Cache,
    pub config: Arc<Config>,
    pub locator: LocationStamper,
    pub connectivity: ConnectivityMonitor,
    pub rate_limiter: RateLimiter,
    pub topup_rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        cache: Cache,
        config: Config,
        locator: LocationStamper,
    ) -> Self {
        let rate_limiter =
            RateLimiter::new(config.rate_limit.max_requests, config.rate_limit.window_secs);
        let topup_rate_limiter =
            RateLimiter::new(config.rate_limit.topup_max, config.rate_limit.window_secs);
        let connectivity = ConnectivityMonitor::new(config.connectivity.ping_timeout);
        Self {
            store,
            cache,
            config: Arc::new(config),
            locator,
            connectivity,
            rate_limiter,
            topup_rate_limiter,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

pub fn build_router(state: AppState) -> Router {
    // --- Auth routes (no auth required) ---
    let auth_routes = Router::new()
        .route("/anonymous", post(routes::auth::anonymous))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Writes are open to anonymous callers; the caller id is logged when known.
    let game_routes = Router::new()
        .route(
            "/",
            get(routes::games::list_games).post(routes::games::create_game),
        )
        .route("/featured", get(routes::games::featured_games))
        .route("/popular", get(routes::games::popular_games))
        .route("/categories", get(routes::games::list_categories))
        .route(
            "/category/:category",
            get(routes::games::games_by_category),
        )
        .route(
            "/:id",
            get(routes::games::get_game)
                .put(routes::games::update_game)
                .delete(routes::games::delete_game),
        )
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::optional_auth,
        ));

    let transaction_routes = Router::new()
        .route(
            "/",
            post(routes::transactions::create_transaction)
                .layer(axum_mw::from_fn_with_state(
                    state.clone(),
                    middleware::rate_limit::topup_rate_limit,
                ))
                .get(routes::transactions::list_transactions),
        )
        .route("/:id", get(routes::transactions::get_transaction))
        .route("/:id/status", put(routes::transactions::update_status))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    let user_routes = Router::new()
        .route("/me", get(routes::users::me))
        .route("/me/location", put(routes::users::update_location))
        .route(
            "/me/favorites/:gameId",
            post(routes::users::add_favorite).delete(routes::users::remove_favorite),
        )
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    // --- Compose full API ---
    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/games", game_routes)
        .nest("/transactions", transaction_routes)
        .nest("/users", user_routes)
        .route(
            "/payment-methods",
            get(routes::transactions::payment_methods),
        );

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(routes::health::health))
        // Global middleware
        .layer(axum_mw::from_fn(middleware::localization::locale_detector))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
