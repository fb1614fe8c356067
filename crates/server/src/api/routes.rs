use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, session, watchlist};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Search session and selection
        .route("/session", get(session::get_session))
        .route("/session/query", put(session::set_query))
        .route("/session/select", post(session::select))
        .route("/session/selection", delete(session::close_detail))
        .route("/session/rating", put(session::set_rating))
        .route("/session/rating/confirm", post(session::confirm_rating))
        // Watchlist
        .route("/watchlist", get(watchlist::list_watchlist))
        .route("/watchlist/{id}", delete(watchlist::remove_watched))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
