use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::leaderboard_service;
use crate::web::routes::status_for;

#[derive(Debug, Deserialize, Default)]
pub struct LeaderboardQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub participant_id: Option<String>,
}

pub async fn leaderboard_handler(
    Query(query): Query<LeaderboardQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(25);

    match leaderboard_service::rank_leaderboard(
        &pool,
        page,
        page_size,
        query.participant_id.as_deref(),
    )
    .await
    {
        Ok(board) => Json(board).into_response(),
        Err(e) => {
            warn!("Leaderboard build failed: {}", e);
            status_for(&e).into_response()
        }
    }
}
