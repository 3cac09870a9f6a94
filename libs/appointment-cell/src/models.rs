// libs/appointment-cell/src/models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix every appointment code carries.
pub const APPOINTMENT_CODE_PREFIX: &str = "APT";

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub code: String,
    pub status: AppointmentStatus,
    pub appointment_time: Option<NaiveDateTime>,
    pub patient_profile_code: Option<String>,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
}

impl Appointment {
    /// Profile code to resolve, ignoring blank values the API sometimes sends.
    pub fn linked_profile_code(&self) -> Option<&str> {
        self.patient_profile_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    CheckedIn,
    InProgress,
    Completed,
    Canceled,
    NoShow,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "PENDING"),
            AppointmentStatus::Confirmed => write!(f, "CONFIRMED"),
            AppointmentStatus::CheckedIn => write!(f, "CHECKED_IN"),
            AppointmentStatus::InProgress => write!(f, "IN_PROGRESS"),
            AppointmentStatus::Completed => write!(f, "COMPLETED"),
            AppointmentStatus::Canceled => write!(f, "CANCELED"),
            AppointmentStatus::NoShow => write!(f, "NO_SHOW"),
        }
    }
}
