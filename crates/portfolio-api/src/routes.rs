use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{admin, contacts, health, leaderboard};

/// Full `/api` route table. Admin routes sit behind `require_auth`.
pub fn router(state: AppState) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), require_auth);

    Router::new()
        .route("/api/", get(health::index))
        .route("/api/health", get(health::health))
        // Contact form: public submit, admin list/delete
        .route(
            "/api/contact",
            post(contacts::submit_contact)
                .merge(get(contacts::list_contacts).route_layer(auth_layer.clone())),
        )
        .route(
            "/api/contact/{id}",
            delete(contacts::delete_contact).route_layer(auth_layer.clone()),
        )
        // Leaderboard
        .route(
            "/api/tetris/scores",
            get(leaderboard::list_scores).post(leaderboard::submit_score),
        )
        .route("/api/tetris/stats", get(leaderboard::get_stats))
        // Admin
        .route("/api/admin/login", post(auth::login))
        .route(
            "/api/admin/contact-messages",
            get(contacts::list_contacts).route_layer(auth_layer.clone()),
        )
        .route("/api/admin/status", get(admin::status).route_layer(auth_layer))
        .fallback(health::not_found)
        .method_not_allowed_fallback(health::method_not_allowed)
        .with_state(state)
}
