use std::sync::Arc;

use axum::{routing::get, routing::post, Router};

use crate::features::auth::handlers::{self, AuthState};
use crate::features::auth::services::AuthService;

/// Routes that issue credentials (no auth required)
pub fn public_routes(auth_service: Arc<AuthService>) -> Router {
    let state = AuthState { auth_service };

    Router::new()
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/admin-login", post(handlers::admin_login))
        .with_state(state)
}

/// Routes that require an authenticated caller
pub fn protected_routes(auth_service: Arc<AuthService>) -> Router {
    let state = AuthState { auth_service };

    Router::new()
        .route("/api/auth/me", get(handlers::me))
        .route("/api/auth/logout", post(handlers::logout))
        .with_state(state)
}
