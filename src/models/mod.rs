pub mod events;
pub mod participants;
pub mod points_transactions;
pub mod registrations;

pub use events::EventRow;
pub use participants::{ParticipantRow, StandingRow};
pub use points_transactions::PointsTransactionRow;
pub use registrations::{RegistrationRow, RegistrationStatus};
