use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{RegistrationRow, RegistrationStatus};

// Blind inserts lose the race on the (event, participant) unique key; the
// DO NOTHING form lets the caller fall back to reading the existing row.
const SQL_INSERT_PRE_REGISTRATION: &str = r#"
INSERT INTO registrations (
  registration_id,
  event_id,
  participant_id,
  status,
  registered_at,
  notes
) VALUES (?, ?, ?, 'PRE_REGISTERED', ?, '')
ON CONFLICT (event_id, participant_id) DO NOTHING
"#;

pub async fn insert_pre_registration(
    pool: &SqlitePool,
    registration_id: &str,
    event_id: &str,
    participant_id: &str,
    registered_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_PRE_REGISTRATION)
        .bind(registration_id)
        .bind(event_id)
        .bind(participant_id)
        .bind(registered_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LOAD_BY_EVENT_AND_PARTICIPANT: &str = r#"
SELECT
  registration_id,
  event_id,
  participant_id,
  status,
  registered_at,
  checked_in_at,
  notes
FROM registrations
WHERE event_id = ?
  AND participant_id = ?
LIMIT 1
"#;

pub async fn load_by_event_and_participant(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
) -> sqlx::Result<Option<RegistrationRow>> {
    sqlx::query_as::<_, RegistrationRow>(SQL_LOAD_BY_EVENT_AND_PARTICIPANT)
        .bind(event_id)
        .bind(participant_id)
        .fetch_optional(pool)
        .await
}

const SQL_LOAD_BY_ID: &str = r#"
SELECT
  registration_id,
  event_id,
  participant_id,
  status,
  registered_at,
  checked_in_at,
  notes
FROM registrations
WHERE registration_id = ?
LIMIT 1
"#;

pub async fn load_by_id(
    pool: &SqlitePool,
    registration_id: &str,
) -> sqlx::Result<Option<RegistrationRow>> {
    sqlx::query_as::<_, RegistrationRow>(SQL_LOAD_BY_ID)
        .bind(registration_id)
        .fetch_optional(pool)
        .await
}

// Re-registration after a cancel reuses the original row, so registration
// identity is stable across cancel/revive cycles.
const SQL_REVIVE: &str = r#"
UPDATE registrations
SET status = 'PRE_REGISTERED', registered_at = ?, checked_in_at = NULL
WHERE registration_id = ?
"#;

pub async fn revive(
    pool: &SqlitePool,
    registration_id: &str,
    registered_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_REVIVE)
        .bind(registered_at)
        .bind(registration_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_SET_STATUS: &str = r#"
UPDATE registrations
SET status = ?
WHERE event_id = ?
  AND participant_id = ?
"#;

pub async fn set_status(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
    status: RegistrationStatus,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_SET_STATUS)
        .bind(status.as_str())
        .bind(event_id)
        .bind(participant_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// The status predicate makes the transition atomic: of any number of
// concurrent attend requests, exactly one observes rows_affected = 1 and
// gets to credit points.
const SQL_MARK_ATTENDED_TRANSITION: &str = r#"
UPDATE registrations
SET status = 'ATTENDED', checked_in_at = ?
WHERE registration_id = ?
  AND status != 'ATTENDED'
"#;

pub async fn mark_attended_transition(
    pool: &SqlitePool,
    registration_id: &str,
    checked_in_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_ATTENDED_TRANSITION)
        .bind(checked_in_at)
        .bind(registration_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_TOUCH_CHECK_IN: &str = r#"
UPDATE registrations
SET checked_in_at = ?
WHERE registration_id = ?
"#;

pub async fn touch_check_in(
    pool: &SqlitePool,
    registration_id: &str,
    checked_in_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_TOUCH_CHECK_IN)
        .bind(checked_in_at)
        .bind(registration_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_FOR_PARTICIPANT: &str = r#"
SELECT
  registration_id,
  event_id,
  participant_id,
  status,
  registered_at,
  checked_in_at,
  notes
FROM registrations
WHERE participant_id = ?
ORDER BY registered_at DESC
LIMIT ?
"#;

pub async fn list_for_participant(
    pool: &SqlitePool,
    participant_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<RegistrationRow>> {
    sqlx::query_as::<_, RegistrationRow>(SQL_LIST_FOR_PARTICIPANT)
        .bind(participant_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}

const SQL_LIST_FOR_PARTICIPANT_WITH_STATUS: &str = r#"
SELECT
  registration_id,
  event_id,
  participant_id,
  status,
  registered_at,
  checked_in_at,
  notes
FROM registrations
WHERE participant_id = ?
  AND status = ?
ORDER BY registered_at DESC
LIMIT ?
"#;

pub async fn list_for_participant_with_status(
    pool: &SqlitePool,
    participant_id: &str,
    status: RegistrationStatus,
    limit: i64,
) -> sqlx::Result<Vec<RegistrationRow>> {
    sqlx::query_as::<_, RegistrationRow>(SQL_LIST_FOR_PARTICIPANT_WITH_STATUS)
        .bind(participant_id)
        .bind(status.as_str())
        .bind(limit)
        .fetch_all(pool)
        .await
}

const SQL_COUNT_FOR_PARTICIPANT_WITH_STATUS: &str = r#"
SELECT COUNT(*)
FROM registrations
WHERE participant_id = ?
  AND status = ?
"#;

pub async fn count_for_participant_with_status(
    pool: &SqlitePool,
    participant_id: &str,
    status: RegistrationStatus,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_FOR_PARTICIPANT_WITH_STATUS)
        .bind(participant_id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await
}

const SQL_LIST_FOR_EVENT_WITH_STATUS: &str = r#"
SELECT
  registration_id,
  event_id,
  participant_id,
  status,
  registered_at,
  checked_in_at,
  notes
FROM registrations
WHERE event_id = ?
  AND status = ?
ORDER BY registered_at ASC
"#;

pub async fn list_for_event_with_status(
    pool: &SqlitePool,
    event_id: &str,
    status: RegistrationStatus,
) -> sqlx::Result<Vec<RegistrationRow>> {
    sqlx::query_as::<_, RegistrationRow>(SQL_LIST_FOR_EVENT_WITH_STATUS)
        .bind(event_id)
        .bind(status.as_str())
        .fetch_all(pool)
        .await
}
