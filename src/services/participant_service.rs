use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::participant_repo;
use crate::error::CoreError;
use crate::models::ParticipantRow;

/// Provision a participant identity. The balance record is the participant
/// row itself, created at zero in the same insert — an identity without a
/// balance cannot exist.
pub async fn create_participant(
    pool: &SqlitePool,
    display_name: &str,
) -> Result<ParticipantRow, CoreError> {
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(CoreError::Validation(
            "display_name must not be empty".to_string(),
        ));
    }

    let participant_id = Uuid::new_v4().to_string();
    participant_repo::insert_participant(pool, &participant_id, display_name, Utc::now()).await?;

    let row = participant_repo::load_participant(pool, &participant_id)
        .await?
        .ok_or(CoreError::NotFound("participant"))?;
    info!("Provisioned participant {} ({})", participant_id, display_name);
    Ok(row)
}

pub async fn get_participant(
    pool: &SqlitePool,
    participant_id: &str,
) -> Result<ParticipantRow, CoreError> {
    participant_repo::load_participant(pool, participant_id)
        .await?
        .ok_or(CoreError::NotFound("participant"))
}

/// Deactivation hides a participant from the leaderboard; the row and its
/// ledger history stay.
pub async fn deactivate_participant(
    pool: &SqlitePool,
    participant_id: &str,
) -> Result<(), CoreError> {
    let updated = participant_repo::deactivate_participant(pool, participant_id).await?;
    if updated == 0 {
        return Err(CoreError::NotFound("participant"));
    }
    Ok(())
}
