use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Profile
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route(
            "/profile/onboarding",
            post(handlers::complete_onboarding).delete(handlers::reset_onboarding),
        )
        // Looks
        .route("/looks/generate", post(handlers::generate_look))
        .route("/looks/current", get(handlers::get_current_look))
        .route("/looks/image", post(handlers::generate_image))
        .route(
            "/looks/saved",
            get(handlers::get_saved_looks).post(handlers::save_look),
        )
        .route("/looks/saved/:id", delete(handlers::remove_saved_look))
        .route("/looks/favorites", get(handlers::get_favorites))
        .route("/looks/:id/favorite", post(handlers::toggle_favorite))
        // History
        .route(
            "/history",
            get(handlers::get_history)
                .post(handlers::add_to_history)
                .delete(handlers::clear_history),
        )
        .route("/history/:id", delete(handlers::remove_from_history))
        // Entitlements
        .route("/entitlements", get(handlers::get_entitlements))
        .route("/entitlements/reset", post(handlers::reset_usage))
}
