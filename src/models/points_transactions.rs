use chrono::{DateTime, Utc};

/// Immutable ledger entry. Created by the points service only, never updated.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PointsTransactionRow {
    pub transaction_id: String,
    pub participant_id: String,
    pub amount: i64,
    pub reason: String,
    pub event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub balance_after: i64,
}
