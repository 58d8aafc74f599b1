use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::warn;

use crate::models::{PointsTransactionRow, RegistrationRow, RegistrationStatus};
use crate::services::{participant_service, points_service, registration_service};
use crate::web::routes::status_for;

#[derive(Debug, Deserialize)]
pub struct CreateParticipantBody {
    pub display_name: String,
}

#[derive(Serialize)]
pub struct ParticipantResponse {
    pub participant_id: String,
    pub display_name: String,
    pub total_points: i64,
    pub is_active: bool,
}

pub async fn create_participant_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<CreateParticipantBody>,
) -> impl IntoResponse {
    match participant_service::create_participant(&pool, &body.display_name).await {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ParticipantResponse {
                participant_id: row.participant_id,
                display_name: row.display_name,
                total_points: row.total_points,
                is_active: row.is_active == 1,
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("Participant creation failed: {}", e);
            status_for(&e).into_response()
        }
    }
}

pub async fn get_participant_handler(
    Path(participant_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    match participant_service::get_participant(&pool, &participant_id).await {
        Ok(row) => Json(ParticipantResponse {
            participant_id: row.participant_id,
            display_name: row.display_name,
            total_points: row.total_points,
            is_active: row.is_active == 1,
        })
        .into_response(),
        Err(e) => {
            warn!("Participant lookup failed for {}: {}", participant_id, e);
            status_for(&e).into_response()
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct TransactionView {
    pub transaction_id: String,
    pub amount: i64,
    pub reason: String,
    pub event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub balance_after: i64,
}

impl From<PointsTransactionRow> for TransactionView {
    fn from(row: PointsTransactionRow) -> Self {
        TransactionView {
            transaction_id: row.transaction_id,
            amount: row.amount,
            reason: row.reason,
            event_id: row.event_id,
            created_at: row.created_at,
            balance_after: row.balance_after,
        }
    }
}

pub async fn list_transactions_handler(
    Path(participant_id): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(20);
    match points_service::list_transactions(&pool, &participant_id, limit).await {
        Ok(rows) => Json(
            rows.into_iter()
                .map(TransactionView::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => {
            warn!("Transaction list failed for {}: {}", participant_id, e);
            status_for(&e).into_response()
        }
    }
}

#[derive(Serialize)]
pub struct RegistrationView {
    pub registration_id: String,
    pub event_id: String,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl From<RegistrationRow> for RegistrationView {
    fn from(row: RegistrationRow) -> Self {
        RegistrationView {
            registration_id: row.registration_id,
            event_id: row.event_id,
            status: row.status,
            registered_at: row.registered_at,
            checked_in_at: row.checked_in_at,
        }
    }
}

pub async fn list_registrations_handler(
    Path(participant_id): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => match RegistrationStatus::parse(raw) {
            Some(status) => Some(status),
            None => return StatusCode::BAD_REQUEST.into_response(),
        },
    };

    let limit = query.limit.unwrap_or(20);
    match registration_service::list_registrations(&pool, &participant_id, status, limit).await {
        Ok(rows) => Json(
            rows.into_iter()
                .map(RegistrationView::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => {
            warn!("Registration list failed for {}: {}", participant_id, e);
            status_for(&e).into_response()
        }
    }
}
