//! Session API handlers: query, selection and rating.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use popcorn_core::{ControllerSnapshot, SessionState, WatchedEntry};

use super::{controller_error, ApiError, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetQueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    /// None when the request toggled the selection off.
    pub selected_id: Option<String>,
}

/// Wider than the 1-10 scale so any out-of-range integer reaches validation
/// and answers 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: i64,
}

impl RatingRequest {
    fn rating(&self) -> Result<u8, ApiError> {
        u8::try_from(self.rating).map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Rating must be between 1 and 10, got {}", self.rating),
                }),
            )
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<ControllerSnapshot> {
    Json(state.controller().snapshot())
}

/// PUT /api/v1/session/query
///
/// Returns the search state right after the query change (usually loading).
pub async fn set_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetQueryRequest>,
) -> Json<SessionState> {
    let controller = state.controller();
    controller.set_query(request.query);
    Json(controller.search().state())
}

/// POST /api/v1/session/select
///
/// Selecting the already selected movie deselects it.
pub async fn select(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> Json<SelectResponse> {
    let selected_id = state.controller().select(&request.id);
    Json(SelectResponse { selected_id })
}

/// DELETE /api/v1/session/selection
pub async fn close_detail(State(state): State<Arc<AppState>>) -> StatusCode {
    state.controller().close_detail();
    StatusCode::NO_CONTENT
}

/// PUT /api/v1/session/rating
pub async fn set_rating(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RatingRequest>,
) -> Result<StatusCode, ApiError> {
    let rating = request.rating()?;
    state
        .controller()
        .set_rating(rating)
        .map_err(controller_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/session/rating/confirm
pub async fn confirm_rating(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RatingRequest>,
) -> Result<(StatusCode, Json<WatchedEntry>), ApiError> {
    let rating = request.rating()?;
    let entry = state
        .controller()
        .confirm_rating(rating)
        .map_err(controller_error)?;
    Ok((StatusCode::CREATED, Json(entry)))
}
