use crate::handlers::auth_handler::{self, AppState};
use crate::middleware::auth::{authenticate, authorize, RouteGuard};
use crate::permissions::{AuthAction, AuthObject, Requirement};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Route-declared permission requirements, mirroring what the routing
/// collaborator would register per endpoint.
const PASSWORD_UPDATE: &[Requirement] =
    &[Requirement::new(AuthObject::User, AuthAction::Update)];

pub fn build_routes(state: Arc<AppState>) -> Router {
    let session_guard = RouteGuard::require(&[]);
    let password_guard = RouteGuard {
        requirements: PASSWORD_UPDATE,
        // The one route that stays open while password_reset is false.
        allow_unreset: true,
    };

    let protected = Router::new()
        .route(
            "/api/v1/auth/logout",
            post(auth_handler::logout)
                .route_layer(middleware::from_fn_with_state(session_guard, authorize)),
        )
        .route(
            "/api/v1/auth/me",
            get(auth_handler::me)
                .route_layer(middleware::from_fn_with_state(session_guard, authorize)),
        )
        .route(
            "/api/v1/user/password",
            put(auth_handler::change_password)
                .route_layer(middleware::from_fn_with_state(password_guard, authorize)),
        )
        // Authentication wraps authorization, so it runs first.
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/api/v1/auth/login", post(auth_handler::login))
        .route("/health", get(health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
