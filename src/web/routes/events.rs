use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::event_service::{self, EventDraft};
use crate::services::registration_service::{self, CancelOutcome, RegisterOutcome};
use crate::web::routes::status_for;

#[derive(Debug, Deserialize)]
pub struct CreateEventBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i64>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub points: Option<i64>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

#[derive(Serialize)]
pub struct CreateEventResponse {
    pub event_id: String,
}

pub async fn create_event_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<CreateEventBody>,
) -> impl IntoResponse {
    let draft = EventDraft {
        title: &body.title,
        description: &body.description,
        venue: &body.venue,
        starts_at: body.starts_at,
        ends_at: body.ends_at,
        capacity: body.capacity,
        registration_deadline: body.registration_deadline,
        points: body.points,
        is_public: body.is_public,
    };
    match event_service::create_event(&pool, draft).await {
        Ok(event) => (
            StatusCode::CREATED,
            Json(CreateEventResponse {
                event_id: event.event_id,
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("Event creation failed: {}", e);
            status_for(&e).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegistrationBody {
    pub participant_id: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

pub async fn register_handler(
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(body): Json<RegistrationBody>,
) -> impl IntoResponse {
    match registration_service::register(&pool, &event_id, &body.participant_id).await {
        Ok(RegisterOutcome::Created { registration_id }) => Json(RegisterResponse {
            status: "created",
            registration_id: Some(registration_id),
            reason: None,
        })
        .into_response(),
        Ok(RegisterOutcome::Revived { registration_id }) => Json(RegisterResponse {
            status: "revived",
            registration_id: Some(registration_id),
            reason: None,
        })
        .into_response(),
        Ok(RegisterOutcome::AlreadyRegistered) => Json(RegisterResponse {
            status: "already_registered",
            registration_id: None,
            reason: None,
        })
        .into_response(),
        Ok(RegisterOutcome::Rejected(rejection)) => Json(RegisterResponse {
            status: "rejected",
            registration_id: None,
            reason: Some(rejection.as_str()),
        })
        .into_response(),
        Err(e) => {
            warn!("Registration failed for event {}: {}", event_id, e);
            status_for(&e).into_response()
        }
    }
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub status: &'static str,
}

pub async fn cancel_handler(
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(body): Json<RegistrationBody>,
) -> impl IntoResponse {
    match registration_service::cancel(&pool, &event_id, &body.participant_id).await {
        Ok(CancelOutcome::Cancelled) => Json(CancelResponse {
            status: "cancelled",
        })
        .into_response(),
        Ok(CancelOutcome::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(CancelResponse {
                status: "not_found",
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("Cancellation failed for event {}: {}", event_id, e);
            status_for(&e).into_response()
        }
    }
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub available_slots: Option<i64>,
}

pub async fn slots_handler(
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    match registration_service::available_slots(&pool, &event_id).await {
        Ok(available_slots) => Json(SlotsResponse { available_slots }).into_response(),
        Err(e) => {
            warn!("Slot lookup failed for event {}: {}", event_id, e);
            status_for(&e).into_response()
        }
    }
}
