use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::PointsTransactionRow;

// The increment happens in the database, not on a value read into memory,
// so concurrent credits to the same participant commute.
const SQL_APPLY_DELTA: &str = r#"
UPDATE participants
SET total_points = total_points + ?
WHERE participant_id = ?
"#;

pub async fn apply_delta(
    conn: &mut SqliteConnection,
    participant_id: &str,
    amount: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_APPLY_DELTA)
        .bind(amount)
        .bind(participant_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LOAD_BALANCE: &str = r#"
SELECT total_points
FROM participants
WHERE participant_id = ?
LIMIT 1
"#;

pub async fn load_balance(
    conn: &mut SqliteConnection,
    participant_id: &str,
) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar::<_, i64>(SQL_LOAD_BALANCE)
        .bind(participant_id)
        .fetch_optional(&mut *conn)
        .await
}

const SQL_INSERT_TRANSACTION: &str = r#"
INSERT INTO points_transactions (
  transaction_id,
  participant_id,
  amount,
  reason,
  event_id,
  created_at,
  balance_after
) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub struct NewPointsTransaction<'a> {
    pub transaction_id: &'a str,
    pub participant_id: &'a str,
    pub amount: i64,
    pub reason: &'a str,
    pub event_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub balance_after: i64,
}

pub async fn insert_transaction(
    conn: &mut SqliteConnection,
    txn: NewPointsTransaction<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_TRANSACTION)
        .bind(txn.transaction_id)
        .bind(txn.participant_id)
        .bind(txn.amount)
        .bind(txn.reason)
        .bind(txn.event_id)
        .bind(txn.created_at)
        .bind(txn.balance_after)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_TRANSACTIONS: &str = r#"
SELECT
  transaction_id,
  participant_id,
  amount,
  reason,
  event_id,
  created_at,
  balance_after
FROM points_transactions
WHERE participant_id = ?
ORDER BY created_at DESC, rowid DESC
LIMIT ?
"#;

pub async fn list_transactions(
    pool: &SqlitePool,
    participant_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<PointsTransactionRow>> {
    sqlx::query_as::<_, PointsTransactionRow>(SQL_LIST_TRANSACTIONS)
        .bind(participant_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}
