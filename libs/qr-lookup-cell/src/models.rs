use serde::{Deserialize, Serialize};

use appointment_cell::{Appointment, APPOINTMENT_CODE_PREFIX};
use patient_cell::PatientProfile;
use shared_models::AppError;

/// Canonical form of a scanned payload: trimmed and upper-cased.
pub fn normalize_payload(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn is_appointment_code(normalized: &str) -> bool {
    normalized.starts_with(APPOINTMENT_CODE_PREFIX)
}

/// Medical-record form fields the scan fills in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordDraft {
    pub appointment_code: Option<String>,
    pub appointment: Option<Appointment>,
    pub patient_profile: Option<PatientProfile>,
}

impl MedicalRecordDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the appointment fields; a profile from an earlier scan no longer applies.
    pub fn apply_appointment(&mut self, appointment: Appointment) {
        self.appointment_code = Some(appointment.code.clone());
        self.appointment = Some(appointment);
        self.patient_profile = None;
    }

    pub fn apply_profile(&mut self, profile: PatientProfile) {
        self.patient_profile = Some(profile);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Code,
    Search,
}

/// Result of running one scanned payload through the lookup flow.
#[derive(Debug)]
pub enum LookupOutcome {
    /// Not an appointment code; nothing was requested.
    Rejected { payload: String },
    AppointmentFailed { code: String, error: AppError },
    Resolved {
        appointment: Appointment,
        profile: Option<(PatientProfile, ProfileSource)>,
    },
    /// Appointment filled, linked profile could not be found.
    PartiallyResolved { appointment: Appointment, profile_code: String },
}

impl LookupOutcome {
    /// Whether the appointment code field got filled.
    pub fn appointment_loaded(&self) -> bool {
        matches!(
            self,
            LookupOutcome::Resolved { .. } | LookupOutcome::PartiallyResolved { .. }
        )
    }

    pub fn appointment(&self) -> Option<&Appointment> {
        match self {
            LookupOutcome::Resolved { appointment, .. }
            | LookupOutcome::PartiallyResolved { appointment, .. } => Some(appointment),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_uppercases() {
        assert_eq!(normalize_payload("  apt12345\n"), "APT12345");
        assert!(is_appointment_code(&normalize_payload(" apt-9 ")));
        assert!(!is_appointment_code(&normalize_payload("PAT001")));
        assert!(!is_appointment_code(&normalize_payload("  ")));
    }
}
