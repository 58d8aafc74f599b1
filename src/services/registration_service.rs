use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::{event_repo, participant_repo, registration_repo};
use crate::error::CoreError;
use crate::models::{RegistrationRow, RegistrationStatus};
use crate::services::points_service;

const ATTENDANCE_REASON: &str = "Event Attendance";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created { registration_id: String },
    Revived { registration_id: String },
    AlreadyRegistered,
    Rejected(RegistrationRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationRejection {
    NotPublic,
    DeadlinePassed,
    AlreadyStarted,
    Full,
}

impl RegistrationRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationRejection::NotPublic => "not_public",
            RegistrationRejection::DeadlinePassed => "deadline_passed",
            RegistrationRejection::AlreadyStarted => "already_started",
            RegistrationRejection::Full => "full",
        }
    }
}

/// Register a participant for an event.
///
/// Read-or-create on the (event, participant) unique key: exactly one
/// concurrent caller creates the row, the others land on the existing one.
/// A CANCELLED row is revived in place so registration identity survives
/// cancel/re-register cycles. No points are credited here.
pub async fn register(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
) -> Result<RegisterOutcome, CoreError> {
    let event = event_repo::load_event(pool, event_id)
        .await?
        .ok_or(CoreError::NotFound("event"))?;

    let now = Utc::now();
    if event.is_public == 0 {
        return Ok(RegisterOutcome::Rejected(RegistrationRejection::NotPublic));
    }
    if let Some(deadline) = event.registration_deadline {
        if deadline <= now {
            return Ok(RegisterOutcome::Rejected(
                RegistrationRejection::DeadlinePassed,
            ));
        }
    }
    if !event.is_upcoming(now) {
        return Ok(RegisterOutcome::Rejected(
            RegistrationRejection::AlreadyStarted,
        ));
    }
    if let Some(capacity) = event.capacity {
        // Check-then-insert window: slight overbooking under concurrent
        // registration near the capacity limit is accepted.
        let occupied = event_repo::count_occupied_slots(pool, event_id).await?;
        if occupied >= capacity {
            return Ok(RegisterOutcome::Rejected(RegistrationRejection::Full));
        }
    }

    participant_repo::load_participant(pool, participant_id)
        .await?
        .ok_or(CoreError::NotFound("participant"))?;

    let registration_id = Uuid::new_v4().to_string();
    let inserted = registration_repo::insert_pre_registration(
        pool,
        &registration_id,
        event_id,
        participant_id,
        now,
    )
    .await?;
    if inserted == 1 {
        info!("Participant {} registered for event {}", participant_id, event_id);
        return Ok(RegisterOutcome::Created { registration_id });
    }

    // Unique-key conflict: recover by reading the existing row.
    let existing = registration_repo::load_by_event_and_participant(pool, event_id, participant_id)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "registration insert conflicted but no row exists for event {} / participant {}",
                event_id, participant_id
            ))
        })?;

    if existing.status == RegistrationStatus::Cancelled.as_str() {
        registration_repo::revive(pool, &existing.registration_id, now).await?;
        info!(
            "Participant {} re-registered for event {}",
            participant_id, event_id
        );
        return Ok(RegisterOutcome::Revived {
            registration_id: existing.registration_id,
        });
    }

    Ok(RegisterOutcome::AlreadyRegistered)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    NotFound,
}

/// Cancel a registration. Unconditional status write; cancelling an already
/// cancelled registration is a harmless no-op.
pub async fn cancel(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
) -> Result<CancelOutcome, CoreError> {
    let updated =
        registration_repo::set_status(pool, event_id, participant_id, RegistrationStatus::Cancelled)
            .await?;
    if updated == 0 {
        return Ok(CancelOutcome::NotFound);
    }
    info!(
        "Participant {} cancelled registration for event {}",
        participant_id, event_id
    );
    Ok(CancelOutcome::Cancelled)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendOutcome {
    Attended { points_awarded: i64 },
    NotFound,
}

/// Mark a registration attended and credit points through the ledger.
///
/// `award_points = None` falls back to the event's configured award. The
/// credit fires only on the transition into ATTENDED: re-saving an already
/// attended registration refreshes the check-in timestamp but never awards
/// a second time.
pub async fn mark_attended(
    pool: &SqlitePool,
    registration_id: &str,
    award_points: Option<i64>,
) -> Result<AttendOutcome, CoreError> {
    let Some(registration) = registration_repo::load_by_id(pool, registration_id).await? else {
        return Ok(AttendOutcome::NotFound);
    };

    let award = match award_points {
        Some(points) => points,
        None => {
            let event = event_repo::load_event(pool, &registration.event_id)
                .await?
                .ok_or(CoreError::NotFound("event"))?;
            event.points_award()
        }
    };

    let now = Utc::now();
    // The status predicate in the UPDATE decides who credits: of any set of
    // concurrent attend requests, exactly one sees the transition.
    let transitioned =
        registration_repo::mark_attended_transition(pool, registration_id, now).await?;
    if transitioned == 0 {
        // Already attended: refresh the check-in timestamp, never re-credit.
        registration_repo::touch_check_in(pool, registration_id, now).await?;
        return Ok(AttendOutcome::Attended { points_awarded: 0 });
    }

    if award != 0 {
        if let Some(participant_id) = registration.participant_id.as_deref() {
            points_service::add_points(
                pool,
                participant_id,
                award,
                ATTENDANCE_REASON,
                Some(&registration.event_id),
            )
            .await?;
            info!(
                "Marked registration {} attended, awarded {} points",
                registration_id, award
            );
            return Ok(AttendOutcome::Attended {
                points_awarded: award,
            });
        }
    }

    Ok(AttendOutcome::Attended { points_awarded: 0 })
}

/// Registration history for a participant, most recent first.
pub async fn list_registrations(
    pool: &SqlitePool,
    participant_id: &str,
    status: Option<RegistrationStatus>,
    limit: i64,
) -> Result<Vec<RegistrationRow>, CoreError> {
    let limit = limit.clamp(1, 200);
    let rows = match status {
        Some(status) => {
            registration_repo::list_for_participant_with_status(pool, participant_id, status, limit)
                .await?
        }
        None => registration_repo::list_for_participant(pool, participant_id, limit).await?,
    };
    Ok(rows)
}

pub async fn attended_count(pool: &SqlitePool, participant_id: &str) -> Result<i64, CoreError> {
    let count = registration_repo::count_for_participant_with_status(
        pool,
        participant_id,
        RegistrationStatus::Attended,
    )
    .await?;
    Ok(count)
}

/// Roster of registrations for one event in a given status, oldest first.
pub async fn event_roster(
    pool: &SqlitePool,
    event_id: &str,
    status: RegistrationStatus,
) -> Result<Vec<RegistrationRow>, CoreError> {
    event_repo::load_event(pool, event_id)
        .await?
        .ok_or(CoreError::NotFound("event"))?;
    let rows = registration_repo::list_for_event_with_status(pool, event_id, status).await?;
    Ok(rows)
}

/// Remaining capacity for an event. None means unbounded.
pub async fn available_slots(
    pool: &SqlitePool,
    event_id: &str,
) -> Result<Option<i64>, CoreError> {
    let event = event_repo::load_event(pool, event_id)
        .await?
        .ok_or(CoreError::NotFound("event"))?;
    let Some(capacity) = event.capacity else {
        return Ok(None);
    };
    let occupied = event_repo::count_occupied_slots(pool, event_id).await?;
    Ok(Some((capacity - occupied).max(0)))
}
