use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::EventRow;

const SQL_INSERT_EVENT: &str = r#"
INSERT INTO events (
  event_id,
  title,
  description,
  venue,
  starts_at,
  ends_at,
  capacity,
  registration_deadline,
  points,
  is_public,
  created_at,
  updated_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub struct NewEvent<'a> {
    pub event_id: &'a str,
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

pub async fn insert_event(pool: &SqlitePool, event: NewEvent<'_>) -> sqlx::Result<u64> {
    let now = Utc::now();
    let res = sqlx::query(SQL_INSERT_EVENT)
        .bind(event.event_id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.venue)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(event.capacity)
        .bind(event.registration_deadline)
        .bind(event.points)
        .bind(if event.is_public { 1i64 } else { 0i64 })
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LOAD_EVENT: &str = r#"
SELECT
  event_id,
  title,
  description,
  venue,
  starts_at,
  ends_at,
  capacity,
  registration_deadline,
  points,
  is_public,
  created_at,
  updated_at
FROM events
WHERE event_id = ?
LIMIT 1
"#;

pub async fn load_event(pool: &SqlitePool, event_id: &str) -> sqlx::Result<Option<EventRow>> {
    sqlx::query_as::<_, EventRow>(SQL_LOAD_EVENT)
        .bind(event_id)
        .fetch_optional(pool)
        .await
}

// Capacity policy: a slot is held by PRE_REGISTERED and CONFIRMED rows.
// Cancelled, attended and no-show registrations free their slot.
const SQL_COUNT_OCCUPIED_SLOTS: &str = r#"
SELECT COUNT(*)
FROM registrations
WHERE event_id = ?
  AND status IN ('PRE_REGISTERED', 'CONFIRMED')
"#;

pub async fn count_occupied_slots(pool: &SqlitePool, event_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_OCCUPIED_SLOTS)
        .bind(event_id)
        .fetch_one(pool)
        .await
}
