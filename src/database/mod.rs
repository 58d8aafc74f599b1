pub mod event_repo;
pub mod participant_repo;
pub mod points_repo;
pub mod registration_repo;
