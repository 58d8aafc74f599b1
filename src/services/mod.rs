pub mod event_service;
pub mod leaderboard_service;
pub mod participant_service;
pub mod points_service;
pub mod registration_service;
