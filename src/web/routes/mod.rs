pub mod attendance;
pub mod events;
pub mod leaderboard;
pub mod participants;

use axum::http::StatusCode;

use crate::error::CoreError;

pub(crate) fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Conflict(_) => StatusCode::CONFLICT,
        CoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
