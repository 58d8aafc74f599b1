use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::event_repo::{self, NewEvent};
use crate::error::CoreError;
use crate::models::EventRow;

pub struct EventDraft<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub venue: &'a str,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i64>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub points: Option<i64>,
    pub is_public: bool,
}

/// Create an event. Window and deadline invariants are checked here, at the
/// creation boundary, so the registration path can rely on them.
pub async fn create_event(pool: &SqlitePool, draft: EventDraft<'_>) -> Result<EventRow, CoreError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()));
    }
    if draft.ends_at <= draft.starts_at {
        return Err(CoreError::Validation(
            "end time must be after start time".to_string(),
        ));
    }
    if let Some(deadline) = draft.registration_deadline {
        if deadline > draft.starts_at {
            return Err(CoreError::Validation(
                "registration deadline must be at or before the start time".to_string(),
            ));
        }
    }
    if let Some(capacity) = draft.capacity {
        if capacity < 0 {
            return Err(CoreError::Validation(
                "capacity must not be negative".to_string(),
            ));
        }
    }

    let event_id = Uuid::new_v4().to_string();
    event_repo::insert_event(
        pool,
        NewEvent {
            event_id: &event_id,
            title,
            description: draft.description,
            venue: draft.venue,
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            capacity: draft.capacity,
            registration_deadline: draft.registration_deadline,
            points: draft.points,
            is_public: draft.is_public,
        },
    )
    .await?;

    let row = event_repo::load_event(pool, &event_id)
        .await?
        .ok_or(CoreError::NotFound("event"))?;
    info!("Created event {} ({})", event_id, title);
    Ok(row)
}

pub async fn get_event(pool: &SqlitePool, event_id: &str) -> Result<EventRow, CoreError> {
    event_repo::load_event(pool, event_id)
        .await?
        .ok_or(CoreError::NotFound("event"))
}
