use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::registration_service::{self, AttendOutcome};
use crate::web::routes::status_for;

#[derive(Debug, Deserialize)]
pub struct AttendBody {
    // Absent means "use the event's configured award".
    pub award_points: Option<i64>,
}

#[derive(Serialize)]
pub struct AttendResponse {
    pub status: &'static str,
    pub points_awarded: i64,
}

pub async fn attend_handler(
    Path(registration_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(body): Json<AttendBody>,
) -> impl IntoResponse {
    match registration_service::mark_attended(&pool, &registration_id, body.award_points).await {
        Ok(AttendOutcome::Attended { points_awarded }) => Json(AttendResponse {
            status: "ok",
            points_awarded,
        })
        .into_response(),
        Ok(AttendOutcome::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(AttendResponse {
                status: "not_found",
                points_awarded: 0,
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("Attendance update failed for {}: {}", registration_id, e);
            status_for(&e).into_response()
        }
    }
}
