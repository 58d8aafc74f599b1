use chrono::{DateTime, Utc};

/// Points credited for attendance when an event has no explicit award set.
pub const DEFAULT_POINTS_AWARD: i64 = 10;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i64>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub points: Option<i64>,
    pub is_public: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRow {
    pub fn points_award(&self) -> i64 {
        self.points.unwrap_or(DEFAULT_POINTS_AWARD)
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        now < self.starts_at
    }
}
