use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{ParticipantRow, StandingRow};

// A participant row is the balance record: inserting the identity and the
// zero balance is one statement, so the two can never exist separately.
const SQL_INSERT_PARTICIPANT: &str = r#"
INSERT INTO participants (
  participant_id,
  display_name,
  is_active,
  total_points,
  created_at
) VALUES (?, ?, 1, 0, ?)
"#;

pub async fn insert_participant(
    pool: &SqlitePool,
    participant_id: &str,
    display_name: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_PARTICIPANT)
        .bind(participant_id)
        .bind(display_name)
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LOAD_PARTICIPANT: &str = r#"
SELECT
  participant_id,
  display_name,
  is_active,
  total_points,
  created_at
FROM participants
WHERE participant_id = ?
LIMIT 1
"#;

pub async fn load_participant(
    pool: &SqlitePool,
    participant_id: &str,
) -> sqlx::Result<Option<ParticipantRow>> {
    sqlx::query_as::<_, ParticipantRow>(SQL_LOAD_PARTICIPANT)
        .bind(participant_id)
        .fetch_optional(pool)
        .await
}

const SQL_DEACTIVATE_PARTICIPANT: &str = r#"
UPDATE participants
SET is_active = 0
WHERE participant_id = ?
"#;

pub async fn deactivate_participant(
    pool: &SqlitePool,
    participant_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DEACTIVATE_PARTICIPANT)
        .bind(participant_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// Sorted here so the ranker only has to walk the list once. The name is a
// deterministic tie-break for ordering; it does not influence ranks.
const SQL_LIST_ACTIVE_STANDINGS: &str = r#"
SELECT
  participant_id,
  display_name,
  total_points
FROM participants
WHERE is_active = 1
ORDER BY total_points DESC, display_name ASC
"#;

pub async fn list_active_standings(pool: &SqlitePool) -> sqlx::Result<Vec<StandingRow>> {
    sqlx::query_as::<_, StandingRow>(SQL_LIST_ACTIVE_STANDINGS)
        .fetch_all(pool)
        .await
}
