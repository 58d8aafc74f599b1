use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    PreRegistered,
    Confirmed,
    Attended,
    Cancelled,
    NoShow,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::PreRegistered => "PRE_REGISTERED",
            RegistrationStatus::Confirmed => "CONFIRMED",
            RegistrationStatus::Attended => "ATTENDED",
            RegistrationStatus::Cancelled => "CANCELLED",
            RegistrationStatus::NoShow => "NO_SHOW",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "PRE_REGISTERED" => Some(RegistrationStatus::PreRegistered),
            "CONFIRMED" => Some(RegistrationStatus::Confirmed),
            "ATTENDED" => Some(RegistrationStatus::Attended),
            "CANCELLED" => Some(RegistrationStatus::Cancelled),
            "NO_SHOW" => Some(RegistrationStatus::NoShow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegistrationRow {
    pub registration_id: String,
    pub event_id: String,
    // Nullable: the row outlives participant removal so ledger history stays intact.
    pub participant_id: Option<String>,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub notes: String,
}
