use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::points_repo::{self, NewPointsTransaction};
use crate::error::CoreError;
use crate::models::PointsTransactionRow;

/// Credit (or debit) a participant's balance and append the matching ledger
/// entry. A zero amount is a no-op, not an error.
///
/// Both writes happen inside one database transaction: the increment is
/// applied against the stored balance, the authoritative post-increment
/// value is re-read, and the ledger row is stamped with that value. A reader
/// can never observe a transaction whose `balance_after` disagrees with the
/// ledger's serial order. Returns the balance after the credit, or None for
/// the zero no-op.
pub async fn add_points(
    pool: &SqlitePool,
    participant_id: &str,
    amount: i64,
    reason: &str,
    event_id: Option<&str>,
) -> Result<Option<i64>, CoreError> {
    if amount == 0 {
        return Ok(None);
    }

    let mut tx = pool.begin().await?;

    let updated = points_repo::apply_delta(&mut tx, participant_id, amount).await?;
    if updated == 0 {
        return Err(CoreError::NotFound("participant"));
    }

    // Re-read rather than compute: a stale in-memory copy would record the
    // wrong snapshot under concurrent increments.
    let balance_after = points_repo::load_balance(&mut tx, participant_id)
        .await?
        .ok_or(CoreError::NotFound("participant"))?;

    let transaction_id = Uuid::new_v4().to_string();
    points_repo::insert_transaction(
        &mut tx,
        NewPointsTransaction {
            transaction_id: &transaction_id,
            participant_id,
            amount,
            reason,
            event_id,
            created_at: Utc::now(),
            balance_after,
        },
    )
    .await?;

    tx.commit().await?;

    info!(
        "Ledger: {} {} points for participant {}, balance now {}",
        if amount > 0 { "credited" } else { "debited" },
        amount.abs(),
        participant_id,
        balance_after
    );
    Ok(Some(balance_after))
}

/// Ledger history for a participant, most recent first.
pub async fn list_transactions(
    pool: &SqlitePool,
    participant_id: &str,
    limit: i64,
) -> Result<Vec<PointsTransactionRow>, CoreError> {
    let rows = points_repo::list_transactions(pool, participant_id, limit.clamp(1, 200)).await?;
    Ok(rows)
}

/// Current balance, read from the authoritative column (not re-derived from
/// the transaction sum, though the two always agree).
pub async fn balance(pool: &SqlitePool, participant_id: &str) -> Result<i64, CoreError> {
    let mut conn = pool.acquire().await?;
    points_repo::load_balance(&mut conn, participant_id)
        .await?
        .ok_or(CoreError::NotFound("participant"))
}
