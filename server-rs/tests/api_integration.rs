//! End-to-end tests driving the router against the in-memory store.

mod common;

use axum::http::StatusCode;
use common::{game_body, TestApp};
use serde_json::json;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_store_status() {
    let app = TestApp::new();

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["online"], true);

    app.store.set_available(false);
    let (_, body) = app.get("/health", None).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["online"], false);
}

// ============================================================================
// Identity
// ============================================================================

#[tokio::test]
async fn test_register_validation_order() {
    let app = TestApp::new();
    let cases = [
        (
            json!({"username": "", "email": "a@b.c", "password": "secret", "confirmPassword": "secret"}),
            "Semua field harus diisi",
        ),
        (
            json!({"username": "budi", "email": "a@b.c", "password": "abc", "confirmPassword": "xyz"}),
            "Password minimal 6 karakter",
        ),
        (
            json!({"username": "budi", "email": "a@b.c", "password": "secret1", "confirmPassword": "secret2"}),
            "Password tidak cocok",
        ),
        (
            json!({"username": "budi", "email": "budi.example.com", "password": "secret", "confirmPassword": "secret"}),
            "Email tidak valid",
        ),
    ];

    for (body, expected) in cases {
        let (status, resp) = app.post("/api/v1/auth/register", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["error"], expected);
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();
    let register = json!({
        "username": "budi",
        "email": "Budi@Example.com ",
        "password": "secret123",
        "confirmPassword": "secret123"
    });

    let (status, resp) = app.post("/api/v1/auth/register", None, register.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(resp.get("token").is_none(), "registration must not sign in");

    let (status, resp) = app.post("/api/v1/auth/register", None, register).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(resp["error"], "Email sudah terdaftar");

    let (status, resp) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": "budi@example.com", "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["error"], "Email atau password salah");

    let (status, resp) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({
                "email": "budi@example.com",
                "password": "secret123",
                "location": {"latitude": -6.2, "longitude": 106.816666}
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(resp["token"].is_string());
    assert_eq!(resp["user"]["username"], "budi");
    assert_eq!(resp["user"]["email"], "budi@example.com");
    assert_eq!(resp["user"]["isAnonymous"], false);
    assert_eq!(resp["user"]["lastLocation"]["latitude"], -6.2);

    let token = resp["token"].as_str().unwrap();
    let (status, me) = app.get("/api/v1/users/me", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["lastLocation"]["longitude"], 106.816666);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::new();
    let (status, resp) = app
        .post("/api/v1/auth/login", None, json!({"email": "a@b.c"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Email dan password harus diisi");

    let (status, resp) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": "a@b.c", "password": "   "}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Email dan password harus diisi");

    let (status, resp) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": "budi.example.com", "password": "secret123"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Email tidak valid");
}

#[tokio::test]
async fn test_refresh_issues_new_tokens() {
    let app = TestApp::new();
    let (_, resp) = app.request("POST", "/api/v1/auth/anonymous", None, None).await;
    let access = resp["token"].as_str().unwrap().to_string();
    let refresh = resp["refreshToken"].as_str().unwrap().to_string();

    let (status, _) = app
        .post("/api/v1/auth/refresh", None, json!({"refreshToken": access}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, resp) = app
        .post("/api/v1/auth/refresh", None, json!({"refreshToken": refresh}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(resp["token"].is_string());

    // A refresh token is not an access token.
    let (status, _) = app.get("/api/v1/transactions", Some(&refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Games
// ============================================================================

#[tokio::test]
async fn test_create_game_round_trips_fields() {
    let app = TestApp::new();
    let token = app.anonymous_token().await;

    let mut body = game_body("  Mobile Legends  ", "MOBA");
    body["isFeatured"] = json!(true);
    body["location"] = json!({"latitude": -6.2, "longitude": 106.8, "accuracy": 12.5});
    let id = app.create_game(Some(&token), body).await;

    let (status, resp) = app.get(&format!("/api/v1/games/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let game = &resp["game"];
    assert_eq!(game["gameName"], "Mobile Legends");
    assert_eq!(game["category"], "MOBA");
    assert_eq!(game["isFeatured"], true);
    assert_eq!(game["isPopular"], false);
    assert!(game["userId"].is_string());
    assert_eq!(game["location"]["accuracy"], 12.5);
    assert!(game["location"]["timestamp"].is_number());

    let options = game["topupOptions"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0]["name"], "86 Diamonds");
    assert_eq!(options[0]["price"], 20000);
    assert_eq!(options[0]["currency"], "IDR");
    assert_eq!(options[0]["bonus"], "+8 Bonus");
    assert_eq!(options[1]["isPopular"], true);
}

#[tokio::test]
async fn test_create_game_without_token_has_no_owner() {
    let app = TestApp::new();
    let id = app.create_game(None, game_body("Genshin Impact", "RPG")).await;

    let (_, resp) = app.get(&format!("/api/v1/games/{id}"), None).await;
    assert!(resp["game"]["userId"].is_null());
}

#[tokio::test]
async fn test_create_game_validation() {
    let app = TestApp::new();
    let cases = [
        ("gameName", json!(""), "Nama game harus diisi"),
        ("gameIcon", json!("   "), "URL icon game harus diisi"),
        ("category", json!(null), "Kategori game harus dipilih"),
        ("category", json!("RACING"), "Kategori game tidak valid"),
        ("topupOptions", json!([]), "Minimal harus ada 1 opsi topup"),
    ];

    for (field, value, expected) in cases {
        let mut body = game_body("Valorant", "FPS");
        body[field] = value;
        let (status, resp) = app.post("/api/v1/games", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
        assert_eq!(resp["error"], expected);
    }

    let (status, resp) = app
        .post(
            "/api/v1/games",
            None,
            json!({
                "gameName": "Valorant",
                "gameIcon": "https://cdn.example.com/valorant.png",
                "category": "FPS",
                "topupOptions": [{"name": "VP", "price": 10000}],
                "location": {"latitude": 123.0, "longitude": 10.0}
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Koordinat lokasi tidak valid");
}

#[tokio::test]
async fn test_list_filters_and_orders_newest_first() {
    let app = TestApp::new();

    let mut ml = game_body("Mobile Legends", "MOBA");
    ml["isPopular"] = json!(true);
    ml["isFeatured"] = json!(true);
    app.create_game(None, ml).await;
    let mut pubg = game_body("PUBG Mobile", "FPS");
    pubg["isPopular"] = json!(true);
    app.create_game(None, pubg).await;
    app.create_game(None, game_body("Genshin Impact", "RPG")).await;
    app.create_game(None, game_body("Arena of Valor", "MOBA")).await;

    let names = |body: &serde_json::Value| -> Vec<String> {
        body["games"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["gameName"].as_str().unwrap().to_string())
            .collect()
    };

    let (status, all) = app.get("/api/v1/games", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&all),
        ["Arena of Valor", "Genshin Impact", "PUBG Mobile", "Mobile Legends"]
    );

    let (_, moba) = app.get("/api/v1/games?category=moba", None).await;
    assert_eq!(names(&moba), ["Arena of Valor", "Mobile Legends"]);

    let (_, moba) = app.get("/api/v1/games/category/MOBA", None).await;
    assert_eq!(names(&moba), ["Arena of Valor", "Mobile Legends"]);

    let (_, popular) = app.get("/api/v1/games/popular", None).await;
    assert_eq!(names(&popular), ["PUBG Mobile", "Mobile Legends"]);

    let (_, featured) = app.get("/api/v1/games/featured", None).await;
    assert_eq!(names(&featured), ["Mobile Legends"]);

    let (_, search) = app.get("/api/v1/games?q=mobile", None).await;
    assert_eq!(names(&search), ["PUBG Mobile", "Mobile Legends"]);

    // The search also matches the category tag.
    let (_, search) = app.get("/api/v1/games?q=rpg", None).await;
    assert_eq!(names(&search), ["Genshin Impact"]);

    let (status, resp) = app.get("/api/v1/games?category=RACING", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Kategori game tidak valid");
}

#[tokio::test]
async fn test_category_summaries_count_games() {
    let app = TestApp::new();
    app.create_game(None, game_body("Mobile Legends", "MOBA")).await;
    app.create_game(None, game_body("Arena of Valor", "MOBA")).await;
    app.create_game(None, game_body("Clash of Clans", "STRATEGY")).await;

    let (status, resp) = app.get("/api/v1/games/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = resp["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 5);

    let count = |id: &str| {
        categories
            .iter()
            .find(|c| c["id"] == id)
            .map(|c| c["gameCount"].as_u64().unwrap())
            .unwrap()
    };
    assert_eq!(count("MOBA"), 2);
    assert_eq!(count("STRATEGY"), 1);
    assert_eq!(count("FPS"), 0);
}

#[tokio::test]
async fn test_update_replaces_topup_options() {
    let app = TestApp::new();
    let id = app.create_game(None, game_body("Free Fire", "FPS")).await;
    let uri = format!("/api/v1/games/{id}");

    let (status, resp) = app
        .put(
            &uri,
            None,
            json!({"topupOptions": [{"name": "100 Diamonds", "price": 15000}], "isPopular": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let options = resp["game"]["topupOptions"].as_array().unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0]["name"], "100 Diamonds");
    assert_eq!(resp["game"]["isPopular"], true);
    assert_eq!(resp["game"]["gameName"], "Free Fire");
    assert_ne!(resp["game"]["updatedAt"], resp["game"]["createdAt"]);

    let (status, resp) = app.put(&uri, None, json!({"topupOptions": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Minimal harus ada 1 opsi topup");

    // A rejected update leaves the stored game untouched.
    let (_, resp) = app.get(&uri, None).await;
    assert_eq!(resp["game"]["topupOptions"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .put(
            "/api/v1/games/00000000-0000-0000-0000-000000000000",
            None,
            json!({"isPopular": true}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_game() {
    let app = TestApp::new();
    let id = app.create_game(None, game_body("Honkai Star Rail", "RPG")).await;
    let uri = format!("/api/v1/games/{id}");

    let (status, resp) = app
        .delete(&format!("{uri}?latitude=-6.2&longitude=106.8"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["success"], true);

    let (status, resp) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["error"], "Game tidak ditemukan");

    let (status, _) = app.delete(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_surfaces_store_failure() {
    let app = TestApp::new();
    app.create_game(None, game_body("Mobile Legends", "MOBA")).await;
    app.store.set_available(false);

    let (status, resp) = app.get("/api/v1/games", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp["error"], "Layanan tidak tersedia. Cek koneksi internet");
}

#[tokio::test]
async fn test_get_game_reports_distance_from_caller() {
    let app = TestApp::new();
    let token = app.anonymous_token().await;

    let mut body = game_body("PUBG Mobile", "FPS");
    body["location"] = json!({"latitude": -7.25, "longitude": 112.75, "address": "Surabaya"});
    let id = app.create_game(None, body).await;
    let uri = format!("/api/v1/games/{id}");

    let (_, resp) = app.get(&uri, Some(&token)).await;
    assert!(resp.get("distanceKm").is_none(), "no caller location yet");

    let (status, _) = app
        .put(
            "/api/v1/users/me/location",
            Some(&token),
            json!({"location": {"latitude": -6.2, "longitude": 106.816666, "address": "Jakarta"}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = app.get(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let km = resp["distanceKm"].as_f64().unwrap();
    assert!((600.0..750.0).contains(&km), "Jakarta to Surabaya was {km} km");

    let (_, resp) = app.get(&uri, None).await;
    assert!(resp.get("distanceKm").is_none());
    assert_eq!(resp["game"]["gameName"], "PUBG Mobile");
}

#[tokio::test]
async fn test_malformed_query_is_json_error() {
    let app = TestApp::new();
    let (status, resp) = app.get("/api/v1/games?popular=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Data permintaan tidak valid");
}

// ============================================================================
// Transactions
// ============================================================================

async fn game_with_option(app: &TestApp) -> (String, String, i64) {
    let id = app.create_game(None, game_body("Mobile Legends", "MOBA")).await;
    let (_, resp) = app.get(&format!("/api/v1/games/{id}"), None).await;
    let option = &resp["game"]["topupOptions"][0];
    (
        id,
        option["id"].as_str().unwrap().to_string(),
        option["price"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn test_transactions_require_token() {
    let app = TestApp::new();
    let (status, resp) = app.get("/api/v1/transactions", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["error"], "Silakan login terlebih dahulu");
}

#[tokio::test]
async fn test_create_transaction_flow() {
    let app = TestApp::new();
    let token = app.anonymous_token().await;
    let (game_id, option_id, price) = game_with_option(&app).await;

    let (status, resp) = app
        .post(
            "/api/v1/transactions",
            Some(&token),
            json!({
                "gameId": game_id,
                "topupOptionId": option_id,
                "paymentMethod": "bank_transfer",
                "userGameId": "  12345678 (2001) "
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{resp}");
    let tx = &resp["transaction"];
    assert_eq!(tx["status"], "pending");
    assert_eq!(tx["amount"], price);
    assert_eq!(tx["paymentMethod"], "bank_transfer");
    assert_eq!(tx["userGameId"], "12345678 (2001)");

    let id = resp["id"].as_str().unwrap();
    let (status, resp) = app
        .get(&format!("/api/v1/transactions/{id}"), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["paymentMethod"]["name"], "Bank Transfer");
    assert_eq!(resp["formattedAmount"], "Rp 20.000");
    let steps = resp["instructions"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[1], "2. Nominal: Rp 20.000");

    let (status, resp) = app
        .put(
            &format!("/api/v1/transactions/{id}/status"),
            Some(&token),
            json!({"status": "completed"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["status"], "completed");
}

#[tokio::test]
async fn test_malformed_bodies_are_json_errors() {
    let app = TestApp::new();
    let token = app.anonymous_token().await;
    let (game_id, option_id, _) = game_with_option(&app).await;

    let (_, resp) = app
        .post(
            "/api/v1/transactions",
            Some(&token),
            json!({"gameId": game_id, "topupOptionId": option_id, "paymentMethod": "dana"}),
        )
        .await;
    let id = resp["id"].as_str().unwrap();

    let (status, resp) = app
        .put(
            &format!("/api/v1/transactions/{id}/status"),
            Some(&token),
            json!({"status": "refunded"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Data permintaan tidak valid");

    let (status, resp) = app
        .post("/api/v1/transactions", Some(&token), json!("not an object"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Data permintaan tidak valid");
}

#[tokio::test]
async fn test_create_transaction_validation() {
    let app = TestApp::new();
    let token = app.anonymous_token().await;
    let (game_id, option_id, _) = game_with_option(&app).await;

    let cases = [
        (json!({"paymentMethod": "dana", "userGameId": " "}), StatusCode::BAD_REQUEST, "Game ID harus diisi"),
        (json!({"userGameId": "123"}), StatusCode::BAD_REQUEST, "Pilih metode pembayaran"),
        (
            json!({"paymentMethod": "paypal", "userGameId": "123"}),
            StatusCode::BAD_REQUEST,
            "Metode pembayaran tidak valid",
        ),
        (
            json!({"paymentMethod": "qris", "userGameId": "123", "topupOptionId": "missing"}),
            StatusCode::NOT_FOUND,
            "Opsi topup tidak ditemukan",
        ),
    ];

    for (mut body, expected_status, expected) in cases {
        body["gameId"] = json!(game_id);
        if body.get("topupOptionId").is_none() {
            body["topupOptionId"] = json!(option_id);
        }
        let (status, resp) = app.post("/api/v1/transactions", Some(&token), body).await;
        assert_eq!(status, expected_status);
        assert_eq!(resp["error"], expected);
    }
}

#[tokio::test]
async fn test_topup_blocked_while_offline() {
    let app = TestApp::new();
    let token = app.anonymous_token().await;
    let (game_id, option_id, _) = game_with_option(&app).await;
    app.store.set_available(false);

    let (status, resp) = app
        .post(
            "/api/v1/transactions",
            Some(&token),
            json!({
                "gameId": game_id,
                "topupOptionId": option_id,
                "paymentMethod": "ovo",
                "userGameId": "123"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(resp["error"].as_str().unwrap().starts_with("Tidak Ada Koneksi"));

    app.store.set_available(true);
    let (_, resp) = app.get("/api/v1/transactions", Some(&token)).await;
    assert!(resp["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_transactions_scoped_to_owner_newest_first() {
    let app = TestApp::new();
    let alice = app.anonymous_token().await;
    let bob = app.anonymous_token().await;
    let (game_id, option_id, _) = game_with_option(&app).await;

    let mut ids = Vec::new();
    for method in ["dana", "gopay"] {
        let (_, resp) = app
            .post(
                "/api/v1/transactions",
                Some(&alice),
                json!({
                    "gameId": game_id,
                    "topupOptionId": option_id,
                    "paymentMethod": method,
                    "userGameId": "123"
                }),
            )
            .await;
        ids.push(resp["id"].as_str().unwrap().to_string());
    }

    let (_, resp) = app.get("/api/v1/transactions", Some(&alice)).await;
    let listed: Vec<&str> = resp["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, [ids[1].as_str(), ids[0].as_str()]);

    let (_, resp) = app.get("/api/v1/transactions", Some(&bob)).await;
    assert!(resp["transactions"].as_array().unwrap().is_empty());

    let (status, _) = app
        .get(&format!("/api/v1/transactions/{}", ids[0]), Some(&bob))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_topup_rate_limit() {
    let app = TestApp::new();
    let token = app.anonymous_token().await;
    let (game_id, option_id, _) = game_with_option(&app).await;
    let body = json!({
        "gameId": game_id,
        "topupOptionId": option_id,
        "paymentMethod": "qris",
        "userGameId": "123"
    });

    for _ in 0..5 {
        let (status, _) = app.post("/api/v1/transactions", Some(&token), body.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, resp) = app.post("/api/v1/transactions", Some(&token), body).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp["error"], "Terlalu banyak permintaan. Coba lagi nanti");
}

#[tokio::test]
async fn test_payment_methods() {
    let app = TestApp::new();
    let (status, resp) = app.get("/api/v1/payment-methods", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = resp["paymentMethods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["dana", "ovo", "gopay", "bank_transfer", "qris"]);
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_favorites_have_set_semantics() {
    let app = TestApp::new();
    let token = app.anonymous_token().await;
    let game_id = app.create_game(None, game_body("Mobile Legends", "MOBA")).await;
    let uri = format!("/api/v1/users/me/favorites/{game_id}");

    for _ in 0..2 {
        let (status, resp) = app.request("POST", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["favoriteGames"], json!([game_id]));
    }

    let (status, resp) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["favoriteGames"], json!([]));

    let (status, _) = app
        .request(
            "POST",
            "/api/v1/users/me/favorites/00000000-0000-0000-0000-000000000000",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_location() {
    let app = TestApp::new();
    let token = app.anonymous_token().await;

    let (status, resp) = app
        .put(
            "/api/v1/users/me/location",
            Some(&token),
            json!({"location": {"latitude": -7.25, "longitude": 112.75, "address": "Surabaya"}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["lastLocation"]["address"], "Surabaya");

    let (_, me) = app.get("/api/v1/users/me", Some(&token)).await;
    assert_eq!(me["user"]["isAnonymous"], true);
    assert_eq!(me["user"]["lastLocation"]["latitude"], -7.25);

    let (status, resp) = app
        .put("/api/v1/users/me/location", Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Lokasi harus diisi");
}
