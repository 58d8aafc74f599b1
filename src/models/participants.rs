use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    pub participant_id: String,
    pub display_name: String,
    pub is_active: i64,
    pub total_points: i64,
    pub created_at: DateTime<Utc>,
}

/// One leaderboard input: an active participant and their current balance.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StandingRow {
    pub participant_id: String,
    pub display_name: String,
    pub total_points: i64,
}
