//! API route definitions.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use openslot_domain::constants::DEFAULT_REQUEST_BODY_LIMIT_BYTES;
use tower_http::cors::{Any, CorsLayer};

use crate::context::AppContext;
use crate::handlers;

/// Build the application router.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::PUT, Method::GET, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([HeaderName::from_static("link")])
        .max_age(Duration::from_secs(300));

    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/add-user", post(handlers::add_user))
        .route("/oauth2callback", get(handlers::oauth_callback))
        .route("/check-availability", get(handlers::check_availability))
        .route("/add-user-to-group", post(handlers::add_user_to_group))
        .route("/list-users", get(handlers::list_users))
        .route("/list-groups", get(handlers::list_groups))
        .route("/schedule-meeting", post(handlers::schedule_meeting))
        .layer(cors)
        .layer(DefaultBodyLimit::max(DEFAULT_REQUEST_BODY_LIMIT_BYTES))
        .with_state(ctx)
}
