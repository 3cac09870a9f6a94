use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use appointment_cell::{Appointment, AppointmentService, APPOINTMENT_CODE_PREFIX};
use patient_cell::{PatientProfile, PatientProfileService, PatientSearchQuery};
use shared_config::AppConfig;
use shared_models::{AppError, Notice, Notifier};

use crate::models::{is_appointment_code, normalize_payload, LookupOutcome, MedicalRecordDraft, ProfileSource};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentLookup: Send + Sync {
    async fn find_appointment(&self, code: &str) -> Result<Appointment, AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientProfileLookup: Send + Sync {
    async fn find_profile(&self, code: &str) -> Result<PatientProfile, AppError>;

    async fn search_profiles(&self, keyword: &str) -> Result<Vec<PatientProfile>, AppError>;
}

#[async_trait]
impl AppointmentLookup for AppointmentService {
    async fn find_appointment(&self, code: &str) -> Result<Appointment, AppError> {
        self.get_by_code(code).await
    }
}

#[async_trait]
impl PatientProfileLookup for PatientProfileService {
    async fn find_profile(&self, code: &str) -> Result<PatientProfile, AppError> {
        self.get_by_code(code).await
    }

    async fn search_profiles(&self, keyword: &str) -> Result<Vec<PatientProfile>, AppError> {
        self.search(PatientSearchQuery::keyword(keyword)).await
    }
}

/// Turns a scanned payload into a filled appointment code and, when the
/// appointment links one, a resolved patient profile.
pub struct QrLookupBridge {
    appointments: Arc<dyn AppointmentLookup>,
    profiles: Arc<dyn PatientProfileLookup>,
    notifier: Arc<dyn Notifier>,
}

impl QrLookupBridge {
    pub fn new(
        appointments: Arc<dyn AppointmentLookup>,
        profiles: Arc<dyn PatientProfileLookup>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            appointments,
            profiles,
            notifier,
        }
    }

    pub fn from_config(config: &AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            Arc::new(AppointmentService::new(config)),
            Arc::new(PatientProfileService::new(config)),
            notifier,
        )
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Run one scanned payload through the lookup flow.
    ///
    /// Fields filled before a later step fails are kept in `draft`.
    pub async fn resolve(&self, raw: &str, draft: &mut MedicalRecordDraft) -> LookupOutcome {
        let code = normalize_payload(raw);

        if !is_appointment_code(&code) {
            warn!("Rejected QR payload without {} prefix: {:?}", APPOINTMENT_CODE_PREFIX, code);
            self.notifier.notify(Notice::error(format!(
                "Invalid QR code. Appointment codes start with {}",
                APPOINTMENT_CODE_PREFIX
            )));
            return LookupOutcome::Rejected { payload: code };
        }

        let appointment = match self.appointments.find_appointment(&code).await {
            Ok(appointment) => appointment,
            Err(e) => {
                error!("Appointment lookup failed for {}: {}", code, e);
                self.notifier.notify(e.notice());
                return LookupOutcome::AppointmentFailed { code, error: e };
            }
        };

        info!("Resolved appointment {} from QR", appointment.code);
        draft.apply_appointment(appointment.clone());

        let Some(profile_code) = appointment.linked_profile_code().map(str::to_string) else {
            self.notifier
                .notify(Notice::success(format!("Loaded appointment {}", appointment.code)));
            return LookupOutcome::Resolved {
                appointment,
                profile: None,
            };
        };

        match self.find_linked_profile(&profile_code).await {
            Some((profile, source)) => {
                draft.apply_profile(profile.clone());
                self.notifier.notify(Notice::success(format!(
                    "Loaded appointment {} for {}",
                    appointment.code, profile.full_name
                )));
                LookupOutcome::Resolved {
                    appointment,
                    profile: Some((profile, source)),
                }
            }
            None => {
                self.notifier.notify(Notice::warning(format!(
                    "Appointment {} loaded, but patient profile {} was not found",
                    appointment.code, profile_code
                )));
                LookupOutcome::PartiallyResolved {
                    appointment,
                    profile_code,
                }
            }
        }
    }

    /// Direct lookup by code, then the first search hit for that code.
    async fn find_linked_profile(&self, profile_code: &str) -> Option<(PatientProfile, ProfileSource)> {
        match self.profiles.find_profile(profile_code).await {
            Ok(profile) => return Some((profile, ProfileSource::Code)),
            Err(e) => warn!("Profile lookup by code {} failed: {}; falling back to search", profile_code, e),
        }

        match self.profiles.search_profiles(profile_code).await {
            Ok(results) => {
                debug!("Profile search for {} returned {} results", profile_code, results.len());
                results.into_iter().next().map(|profile| (profile, ProfileSource::Search))
            }
            Err(e) => {
                warn!("Profile search for {} failed: {}", profile_code, e);
                None
            }
        }
    }
}
