pub mod handlers;
pub mod routes;
pub mod session;
pub mod watchlist;

pub use routes::create_router;

use axum::{http::StatusCode, Json};
use popcorn_core::{ControllerError, WatchlistError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a controller failure to an HTTP status and message.
pub fn controller_error(err: ControllerError) -> ApiError {
    let status = match &err {
        ControllerError::InvalidRating(_)
        | ControllerError::Watchlist(WatchlistError::InvalidRating(_)) => StatusCode::BAD_REQUEST,
        ControllerError::NoSelection => StatusCode::NOT_FOUND,
        ControllerError::DetailNotReady(_)
        | ControllerError::Watchlist(WatchlistError::AlreadyWatched(_)) => StatusCode::CONFLICT,
        ControllerError::Watchlist(WatchlistError::Persistence(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
