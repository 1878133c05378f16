//! HTTP surface: route table and per-group access gating.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::gate;
use crate::AppState;

pub mod handlers;

/// Build the full application router.
///
/// Route groups differ only in which access-gate layers sit in front of
/// them: admin routes run the authentication check then the role check,
/// self-scoped routes run the authentication check alone and do their
/// ownership comparison in the handler, public routes run neither.
pub fn app(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/admin/:id", patch(handlers::promote_admin))
        .route("/users/:id", delete(handlers::remove_user))
        .route("/admin-stats", get(handlers::admin_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_admin,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::authenticate,
        ));

    // The GET shares the promote route's `:id` template (axum wants one
    // parameter name per path position); the value it carries is an email.
    let self_routes = Router::new()
        .route("/users/admin/:id", get(handlers::is_admin))
        .route("/payments/:email", get(handlers::list_payments))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::authenticate,
        ));

    let public_routes = Router::new()
        .route("/", get(handlers::banner))
        .route("/healthz", get(|| async { "ok" }))
        .route("/jwt", post(handlers::issue_token))
        .route("/users", post(handlers::register))
        .route("/menu", get(handlers::list_menu))
        .route("/reviews", get(handlers::list_reviews))
        .route("/carts", get(handlers::list_carts).post(handlers::add_cart))
        .route("/carts/:id", delete(handlers::remove_cart))
        .route(
            "/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route("/payments", post(handlers::settle));

    Router::new()
        .merge(admin_routes)
        .merge(self_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
