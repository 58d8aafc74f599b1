use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use eventease::database::event_repo::{self, NewEvent};
use eventease::services::participant_service;

// Single connection: every handle must see the same in-memory database.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

pub async fn seed_participant(pool: &SqlitePool, display_name: &str) -> String {
    participant_service::create_participant(pool, display_name)
        .await
        .expect("create participant")
        .participant_id
}

pub struct SeedEvent {
    pub starts_in_hours: i64,
    pub capacity: Option<i64>,
    pub deadline_in_hours: Option<i64>,
    pub points: Option<i64>,
    pub is_public: bool,
}

impl Default for SeedEvent {
    fn default() -> Self {
        SeedEvent {
            starts_in_hours: 24,
            capacity: None,
            deadline_in_hours: None,
            points: None,
            is_public: true,
        }
    }
}

pub async fn seed_event(pool: &SqlitePool, seed: SeedEvent) -> String {
    let event_id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let starts_at = now + Duration::hours(seed.starts_in_hours);
    event_repo::insert_event(
        pool,
        NewEvent {
            event_id: &event_id,
            title: "Test Event",
            description: "",
            venue: "Main hall",
            starts_at,
            ends_at: starts_at + Duration::hours(2),
            capacity: seed.capacity,
            registration_deadline: seed
                .deadline_in_hours
                .map(|hours| now + Duration::hours(hours)),
            points: seed.points,
            is_public: seed.is_public,
        },
    )
    .await
    .expect("insert event");
    event_id
}
