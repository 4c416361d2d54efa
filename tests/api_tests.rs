use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use axum_test::TestServer;
use serde_json::{json, Value};
use tower::ServiceExt;

use glowguide::{
    api::{create_router, AppState},
    db::MemoryStore,
    services::{
        entitlement::{FreeTierLimits, SubscriptionStatus},
        LookGenerator, StaticEntitlements,
    },
};

async fn create_state_with(status: SubscriptionStatus, limits: FreeTierLimits) -> AppState {
    AppState::initialize(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticEntitlements::new(status)),
        limits,
        LookGenerator::new(None, None, Duration::ZERO),
    )
    .await
    .unwrap()
}

async fn create_state(status: SubscriptionStatus) -> AppState {
    create_state_with(status, FreeTierLimits::default()).await
}

async fn create_test_server() -> TestServer {
    let state = create_state(SubscriptionStatus::None).await;
    TestServer::new(create_router(state)).unwrap()
}

async fn generate(server: &TestServer, occasion: &str, mood: &str) -> Value {
    let response = server
        .post("/api/v1/looks/generate")
        .json(&json!({ "occasion": occasion, "mood": mood }))
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_business_confident_tan_is_polished_professional() {
    let server = create_test_server().await;

    server
        .put("/api/v1/profile")
        .json(&json!({
            "id": "user-1",
            "skinTone": "tan",
            "stylePreference": "natural"
        }))
        .await
        .assert_status_ok();

    let body = generate(&server, "business", "confident").await;
    let look = &body["look"];

    assert_eq!(body["source"], "fallback");
    assert_eq!(look["lookName"], "Polished Professional");
    assert_eq!(look["vibe"], "Clean & Confident");
    assert_eq!(look["occasion"], "business");
    assert_eq!(look["mood"], "confident");
    assert_eq!(look["steps"].as_array().unwrap().len(), 6);

    let palette = look["colorPalette"].as_object().unwrap();
    let mut keys: Vec<&str> = palette.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["blush", "brows", "eyeliner", "eyeshadow", "lips"]);
}

#[tokio::test]
async fn test_date_night_bold_is_sultry_siren() {
    let server = create_test_server().await;
    let body = generate(&server, "dateNight", "bold").await;
    assert_eq!(body["look"]["lookName"], "Sultry Siren");
}

#[tokio::test]
async fn test_unmatched_pair_is_golden_hour_glow() {
    let server = create_test_server().await;
    let body = generate(&server, "event", "mysterious").await;
    assert_eq!(body["look"]["lookName"], "Golden Hour Glow");
    assert_eq!(body["look"]["vibe"], "Warm & Radiant");
}

#[tokio::test]
async fn test_generation_limit_returns_paywall() {
    let server = create_test_server().await;

    for remaining in [2, 1, 0] {
        let body = generate(&server, "casual", "fresh").await;
        assert_eq!(body["remainingFreeLooks"], remaining);
    }

    let response = server
        .post("/api/v1/looks/generate")
        .json(&json!({ "occasion": "casual", "mood": "fresh" }))
        .await;
    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    let body: Value = response.json();
    assert_eq!(body["trigger"], "freeLimitReached");
    assert_eq!(body["title"], "Free Limit Reached");

    let status: Value = server.get("/api/v1/entitlements").await.json();
    assert_eq!(status["looksGenerated"], 3);
    assert_eq!(status["canGenerate"], false);

    server
        .post("/api/v1/entitlements/reset")
        .await
        .assert_status_ok();
    generate(&server, "casual", "fresh").await;
}

#[tokio::test]
async fn test_concurrent_generations_respect_free_limit() {
    let state = AppState::initialize(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticEntitlements::new(SubscriptionStatus::None)),
        FreeTierLimits::default(),
        LookGenerator::new(None, None, Duration::from_millis(200)),
    )
    .await
    .unwrap();
    let app = create_router(state.clone());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                let request = Request::builder()
                    .method("POST")
                    .uri("/api/v1/looks/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "occasion": "casual", "mood": "fresh" }).to_string(),
                    ))
                    .unwrap();
                app.oneshot(request).await.unwrap().status()
            })
        })
        .collect();

    let mut ok = 0;
    let mut refused = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        if status == StatusCode::OK {
            ok += 1;
        } else if status == StatusCode::PAYMENT_REQUIRED {
            refused += 1;
        } else {
            panic!("unexpected status {}", status);
        }
    }

    assert_eq!(ok, 3);
    assert_eq!(refused, 7);
    assert_eq!(state.gate.counters().await.looks_generated, 3);
    assert_eq!(state.library.history().await.len(), 3);
}

#[tokio::test]
async fn test_pro_generates_past_limit() {
    let state = create_state(SubscriptionStatus::Monthly).await;
    let server = TestServer::new(create_router(state)).unwrap();

    for _ in 0..5 {
        generate(&server, "party", "playful").await;
    }

    let status: Value = server.get("/api/v1/entitlements").await.json();
    assert_eq!(status["isPro"], true);
    assert_eq!(status["looksGenerated"], 5);
}

#[tokio::test]
async fn test_generated_look_becomes_current_and_enters_history() {
    let server = create_test_server().await;

    server
        .get("/api/v1/looks/current")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let body = generate(&server, "wedding", "elegant").await;
    let look_id = body["look"]["id"].as_str().unwrap();

    let current: Value = server.get("/api/v1/looks/current").await.json();
    assert_eq!(current["id"], look_id);

    let history: Vec<Value> = server.get("/api/v1/history").await.json();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["id"], look_id);
}

#[tokio::test]
async fn test_save_and_remove_look_flow() {
    let state = create_state_with(
        SubscriptionStatus::None,
        FreeTierLimits { looks: 10, saves: 3 },
    )
    .await;
    let server = TestServer::new(create_router(state)).unwrap();

    let mut saved_ids = Vec::new();
    for _ in 0..3 {
        let body = generate(&server, "casual", "playful").await;

        let response = server
            .post("/api/v1/looks/saved")
            .json(&body["look"])
            .await;
        response.assert_status(StatusCode::CREATED);
        saved_ids.push(body["look"]["id"].as_str().unwrap().to_string());
    }

    // Saving the same look again is a no-op
    let saved: Vec<Value> = server.get("/api/v1/looks/saved").await.json();
    server
        .post("/api/v1/looks/saved")
        .json(&saved[0])
        .await
        .assert_status_ok();

    let extra = generate(&server, "casual", "playful").await;
    let response = server
        .post("/api/v1/looks/saved")
        .json(&extra["look"])
        .await;
    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    let body: Value = response.json();
    assert_eq!(body["trigger"], "savedLimitReached");

    let profile: Value = server.get("/api/v1/profile").await.json();
    assert_eq!(profile["savedLookIds"], json!(saved_ids));

    server
        .delete(&format!("/api/v1/looks/saved/{}", saved_ids[0]))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("/api/v1/looks/saved/{}", saved_ids[0]))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let status: Value = server.get("/api/v1/entitlements").await.json();
    assert_eq!(status["savedLooksCount"], 2);
    assert_eq!(status["remainingSavedSlots"], 1);
}

#[tokio::test]
async fn test_save_rejects_invalid_look() {
    let server = create_test_server().await;
    let mut look = generate(&server, "business", "bold").await["look"].clone();
    look["steps"] = json!([]);

    server
        .post("/api/v1/looks/saved")
        .json(&look)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorites_toggle() {
    let server = create_test_server().await;
    let body = generate(&server, "party", "bold").await;
    let look_id = body["look"]["id"].as_str().unwrap();

    let toggled: Value = server
        .post(&format!("/api/v1/looks/{}/favorite", look_id))
        .await
        .json();
    assert_eq!(toggled["isFavorite"], true);

    let favorites: Value = server.get("/api/v1/looks/favorites").await.json();
    assert_eq!(favorites["ids"], json!([look_id]));
    assert_eq!(favorites["looks"][0]["lookName"], "Glamour Night");

    let toggled: Value = server
        .post(&format!("/api/v1/looks/{}/favorite", look_id))
        .await
        .json();
    assert_eq!(toggled["isFavorite"], false);
}

#[tokio::test]
async fn test_history_management() {
    let server = create_test_server().await;
    let first = generate(&server, "casual", "fresh").await;
    let second = generate(&server, "business", "fresh").await;

    server
        .post("/api/v1/history")
        .json(&first["look"])
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let history: Vec<Value> = server.get("/api/v1/history").await.json();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["id"], first["look"]["id"]);
    assert_eq!(history[1]["id"], second["look"]["id"]);

    let second_id = second["look"]["id"].as_str().unwrap();
    server
        .delete(&format!("/api/v1/history/{}", second_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete("/api/v1/history")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let history: Vec<Value> = server.get("/api/v1/history").await.json();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_onboarding_flow() {
    let server = create_test_server().await;

    let profile: Value = server
        .post("/api/v1/profile/onboarding")
        .json(&json!({ "skinTone": "deep", "stylePreference": "glamorous" }))
        .await
        .json();
    assert_eq!(profile["hasCompletedOnboarding"], true);
    assert_eq!(profile["skinTone"], "deep");

    let profile: Value = server.delete("/api/v1/profile/onboarding").await.json();
    assert_eq!(profile["hasCompletedOnboarding"], false);
    assert_eq!(profile["stylePreference"], "glamorous");
}

#[tokio::test]
async fn test_image_without_provider_is_unavailable() {
    let server = create_test_server().await;
    generate(&server, "event", "bold").await;

    let response = server
        .post("/api/v1/looks/image")
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_state_survives_restart() {
    let store = Arc::new(MemoryStore::new());
    let build = |store: Arc<MemoryStore>| async move {
        AppState::initialize(
            store,
            Arc::new(StaticEntitlements::new(SubscriptionStatus::None)),
            FreeTierLimits::default(),
            LookGenerator::new(None, None, Duration::ZERO),
        )
        .await
        .unwrap()
    };

    let state = build(store.clone()).await;
    let server = TestServer::new(create_router(state.clone())).unwrap();
    let body = generate(&server, "wedding", "fresh").await;
    server.post("/api/v1/looks/saved").json(&body["look"]).await;
    tokio_test::assert_ok!(state.shutdown().await);

    let restarted = build(store).await;
    let server = TestServer::new(create_router(restarted)).unwrap();

    let status: Value = server.get("/api/v1/entitlements").await.json();
    assert_eq!(status["looksGenerated"], 1);
    assert_eq!(status["savedLooksCount"], 1);

    let saved: Vec<Value> = server.get("/api/v1/looks/saved").await.json();
    assert_eq!(saved[0]["id"], body["look"]["id"]);
    assert_eq!(saved[0]["lookName"], "Romantic Elegance");
}
