use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, MatchedPath, Request};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

use laterlock_core::{Clock, LockService, LockStore};

use super::handlers;
use crate::constants::MAX_BODY_BYTES;

/// Build the API router around a ready service.
///
/// Request spans carry the matched route template, never the raw URI, since
/// lock IDs are bearer capabilities.
pub fn router<S, C>(service: Arc<LockService<S, C>>) -> Router
where
    S: LockStore + 'static,
    C: Clock + Clone + 'static,
{
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str)
                .unwrap_or("unmatched");
            tracing::info_span!(
                "request",
                request_id = %Uuid::now_v7(),
                method = %request.method(),
                route,
            )
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/locks", post(handlers::create_lock::<S, C>))
        .route(
            "/api/locks/:id",
            get(handlers::get_lock::<S, C>)
                .post(handlers::apply_action::<S, C>)
                .delete(handlers::delete_lock::<S, C>),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(trace)
        .with_state(service)
}
