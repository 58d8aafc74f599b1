mod common;

use common::{seed_event, seed_participant, setup_pool, SeedEvent};
use eventease::database::registration_repo;
use eventease::error::CoreError;
use eventease::models::RegistrationStatus;
use eventease::services::points_service;
use eventease::services::registration_service::{
    self, AttendOutcome, CancelOutcome, RegisterOutcome, RegistrationRejection,
};

#[tokio::test]
async fn register_creates_pre_registration() {
    let pool = setup_pool().await;
    let event_id = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let outcome = registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    let RegisterOutcome::Created { registration_id } = outcome else {
        panic!("expected Created, got {:?}", outcome);
    };

    let row = registration_repo::load_by_id(&pool, &registration_id)
        .await
        .unwrap()
        .expect("registration row");
    assert_eq!(row.status, RegistrationStatus::PreRegistered.as_str());
    assert_eq!(row.participant_id.as_deref(), Some(participant_id.as_str()));
    assert!(row.checked_in_at.is_none());
}

#[tokio::test]
async fn second_register_reports_already_registered() {
    let pool = setup_pool().await;
    let event_id = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let first = registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    let RegisterOutcome::Created {
        registration_id: original_id,
    } = first
    else {
        panic!("expected Created, got {:?}", first);
    };

    let second = registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    assert_eq!(second, RegisterOutcome::AlreadyRegistered);

    // Still exactly one record, and it is the original one.
    let row = registration_repo::load_by_event_and_participant(&pool, &event_id, &participant_id)
        .await
        .unwrap()
        .expect("registration row");
    assert_eq!(row.registration_id, original_id);
}

#[tokio::test]
async fn cancel_then_register_revives_the_same_record() {
    let pool = setup_pool().await;
    let event_id = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let first = registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    let RegisterOutcome::Created {
        registration_id: original_id,
    } = first
    else {
        panic!("expected Created, got {:?}", first);
    };

    let cancelled = registration_service::cancel(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    assert_eq!(cancelled, CancelOutcome::Cancelled);

    let revived = registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    assert_eq!(
        revived,
        RegisterOutcome::Revived {
            registration_id: original_id.clone()
        }
    );

    let row = registration_repo::load_by_id(&pool, &original_id)
        .await
        .unwrap()
        .expect("registration row");
    assert_eq!(row.status, RegistrationStatus::PreRegistered.as_str());
}

#[tokio::test]
async fn cancel_without_registration_reports_not_found() {
    let pool = setup_pool().await;
    let event_id = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let outcome = registration_service::cancel(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    assert_eq!(outcome, CancelOutcome::NotFound);
}

#[tokio::test]
async fn cancel_is_idempotent() {
    let pool = setup_pool().await;
    let event_id = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    registration_service::cancel(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    let again = registration_service::cancel(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    assert_eq!(again, CancelOutcome::Cancelled);
}

#[tokio::test]
async fn full_event_rejects_second_participant() {
    let pool = setup_pool().await;
    let event_id = seed_event(
        &pool,
        SeedEvent {
            capacity: Some(1),
            ..SeedEvent::default()
        },
    )
    .await;
    let first = seed_participant(&pool, "Ana").await;
    let second = seed_participant(&pool, "Bo").await;

    let outcome = registration_service::register(&pool, &event_id, &first)
        .await
        .unwrap();
    assert!(matches!(outcome, RegisterOutcome::Created { .. }));

    let outcome = registration_service::register(&pool, &event_id, &second)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        RegisterOutcome::Rejected(RegistrationRejection::Full)
    );
}

#[tokio::test]
async fn cancelled_registration_frees_its_slot() {
    let pool = setup_pool().await;
    let event_id = seed_event(
        &pool,
        SeedEvent {
            capacity: Some(1),
            ..SeedEvent::default()
        },
    )
    .await;
    let first = seed_participant(&pool, "Ana").await;
    let second = seed_participant(&pool, "Bo").await;

    registration_service::register(&pool, &event_id, &first)
        .await
        .unwrap();
    registration_service::cancel(&pool, &event_id, &first)
        .await
        .unwrap();

    let outcome = registration_service::register(&pool, &event_id, &second)
        .await
        .unwrap();
    assert!(matches!(outcome, RegisterOutcome::Created { .. }));
}

#[tokio::test]
async fn passed_deadline_rejects_registration() {
    let pool = setup_pool().await;
    let event_id = seed_event(
        &pool,
        SeedEvent {
            deadline_in_hours: Some(-1),
            ..SeedEvent::default()
        },
    )
    .await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let outcome = registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        RegisterOutcome::Rejected(RegistrationRejection::DeadlinePassed)
    );
}

#[tokio::test]
async fn started_event_rejects_registration() {
    let pool = setup_pool().await;
    let event_id = seed_event(
        &pool,
        SeedEvent {
            starts_in_hours: -1,
            ..SeedEvent::default()
        },
    )
    .await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let outcome = registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        RegisterOutcome::Rejected(RegistrationRejection::AlreadyStarted)
    );
}

#[tokio::test]
async fn private_event_rejects_registration() {
    let pool = setup_pool().await;
    let event_id = seed_event(
        &pool,
        SeedEvent {
            is_public: false,
            ..SeedEvent::default()
        },
    )
    .await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let outcome = registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        RegisterOutcome::Rejected(RegistrationRejection::NotPublic)
    );
}

#[tokio::test]
async fn register_for_unknown_event_errors() {
    let pool = setup_pool().await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let err = registration_service::register(&pool, "missing", &participant_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound("event")));
}

#[tokio::test]
async fn mark_attended_credits_points_exactly_once() {
    let pool = setup_pool().await;
    let event_id = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let outcome = registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    let RegisterOutcome::Created { registration_id } = outcome else {
        panic!("expected Created, got {:?}", outcome);
    };

    let attended = registration_service::mark_attended(&pool, &registration_id, Some(10))
        .await
        .unwrap();
    assert_eq!(attended, AttendOutcome::Attended { points_awarded: 10 });

    let row = registration_repo::load_by_id(&pool, &registration_id)
        .await
        .unwrap()
        .expect("registration row");
    assert_eq!(row.status, RegistrationStatus::Attended.as_str());
    assert!(row.checked_in_at.is_some());

    assert_eq!(points_service::balance(&pool, &participant_id).await.unwrap(), 10);

    // Re-saving an already attended registration must not credit again.
    let again = registration_service::mark_attended(&pool, &registration_id, Some(10))
        .await
        .unwrap();
    assert_eq!(again, AttendOutcome::Attended { points_awarded: 0 });
    assert_eq!(points_service::balance(&pool, &participant_id).await.unwrap(), 10);

    let transactions = points_service::list_transactions(&pool, &participant_id, 50)
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].amount, 10);
    assert_eq!(transactions[0].event_id.as_deref(), Some(event_id.as_str()));
    assert_eq!(transactions[0].reason, "Event Attendance");
}

#[tokio::test]
async fn simultaneous_attend_requests_credit_once() {
    let pool = setup_pool().await;
    let event_id = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let RegisterOutcome::Created { registration_id } =
        registration_service::register(&pool, &event_id, &participant_id)
            .await
            .unwrap()
    else {
        panic!("expected Created");
    };

    // Both run against the same registration; the status-predicated UPDATE
    // lets exactly one of them win the transition and credit.
    let (first, second) = tokio::join!(
        registration_service::mark_attended(&pool, &registration_id, Some(10)),
        registration_service::mark_attended(&pool, &registration_id, Some(10)),
    );
    let awarded = match (first.unwrap(), second.unwrap()) {
        (
            AttendOutcome::Attended { points_awarded: a },
            AttendOutcome::Attended { points_awarded: b },
        ) => a + b,
        other => panic!("expected two Attended outcomes, got {:?}", other),
    };
    assert_eq!(awarded, 10);

    assert_eq!(points_service::balance(&pool, &participant_id).await.unwrap(), 10);
    let transactions = points_service::list_transactions(&pool, &participant_id, 10)
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
}

#[tokio::test]
async fn mark_attended_defaults_to_event_award() {
    let pool = setup_pool().await;
    let event_id = seed_event(
        &pool,
        SeedEvent {
            points: Some(25),
            ..SeedEvent::default()
        },
    )
    .await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let RegisterOutcome::Created { registration_id } =
        registration_service::register(&pool, &event_id, &participant_id)
            .await
            .unwrap()
    else {
        panic!("expected Created");
    };

    let attended = registration_service::mark_attended(&pool, &registration_id, None)
        .await
        .unwrap();
    assert_eq!(attended, AttendOutcome::Attended { points_awarded: 25 });
}

#[tokio::test]
async fn mark_attended_default_award_is_ten_when_unset() {
    let pool = setup_pool().await;
    let event_id = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let RegisterOutcome::Created { registration_id } =
        registration_service::register(&pool, &event_id, &participant_id)
            .await
            .unwrap()
    else {
        panic!("expected Created");
    };

    let attended = registration_service::mark_attended(&pool, &registration_id, None)
        .await
        .unwrap();
    assert_eq!(attended, AttendOutcome::Attended { points_awarded: 10 });
}

#[tokio::test]
async fn mark_attended_unknown_registration_reports_not_found() {
    let pool = setup_pool().await;

    let outcome = registration_service::mark_attended(&pool, "missing", Some(10))
        .await
        .unwrap();
    assert_eq!(outcome, AttendOutcome::NotFound);
}

#[tokio::test]
async fn registration_history_and_stats() {
    let pool = setup_pool().await;
    let first_event = seed_event(&pool, SeedEvent::default()).await;
    let second_event = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let RegisterOutcome::Created { registration_id } =
        registration_service::register(&pool, &first_event, &participant_id)
            .await
            .unwrap()
    else {
        panic!("expected Created");
    };
    registration_service::register(&pool, &second_event, &participant_id)
        .await
        .unwrap();
    registration_service::mark_attended(&pool, &registration_id, Some(0))
        .await
        .unwrap();

    let all = registration_service::list_registrations(&pool, &participant_id, None, 20)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let attended = registration_service::list_registrations(
        &pool,
        &participant_id,
        Some(RegistrationStatus::Attended),
        20,
    )
    .await
    .unwrap();
    assert_eq!(attended.len(), 1);
    assert_eq!(attended[0].registration_id, registration_id);

    assert_eq!(
        registration_service::attended_count(&pool, &participant_id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn available_slots_tracks_occupancy() {
    let pool = setup_pool().await;
    let event_id = seed_event(
        &pool,
        SeedEvent {
            capacity: Some(2),
            ..SeedEvent::default()
        },
    )
    .await;
    let unbounded_event = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    assert_eq!(
        registration_service::available_slots(&pool, &event_id)
            .await
            .unwrap(),
        Some(2)
    );
    assert_eq!(
        registration_service::available_slots(&pool, &unbounded_event)
            .await
            .unwrap(),
        None
    );

    registration_service::register(&pool, &event_id, &participant_id)
        .await
        .unwrap();
    assert_eq!(
        registration_service::available_slots(&pool, &event_id)
            .await
            .unwrap(),
        Some(1)
    );
}

#[tokio::test]
async fn zero_award_marks_attendance_without_ledger_entry() {
    let pool = setup_pool().await;
    let event_id = seed_event(&pool, SeedEvent::default()).await;
    let participant_id = seed_participant(&pool, "Ana").await;

    let RegisterOutcome::Created { registration_id } =
        registration_service::register(&pool, &event_id, &participant_id)
            .await
            .unwrap()
    else {
        panic!("expected Created");
    };

    let outcome = registration_service::mark_attended(&pool, &registration_id, Some(0))
        .await
        .unwrap();
    assert_eq!(outcome, AttendOutcome::Attended { points_awarded: 0 });
    assert_eq!(points_service::balance(&pool, &participant_id).await.unwrap(), 0);
    assert!(points_service::list_transactions(&pool, &participant_id, 10)
        .await
        .unwrap()
        .is_empty());
}
