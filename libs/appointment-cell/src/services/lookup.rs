use tracing::debug;

use shared_api::{rest::path_segment, RestClient};
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{Appointment, APPOINTMENT_CODE_PREFIX};

pub struct AppointmentService {
    client: RestClient,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RestClient::new(config),
        }
    }

    pub fn with_client(client: RestClient) -> Self {
        Self { client }
    }

    /// Resolve an `APT...` code to its appointment.
    pub async fn get_by_code(&self, code: &str) -> Result<Appointment, AppError> {
        let code = code.trim().to_uppercase();
        if !code.starts_with(APPOINTMENT_CODE_PREFIX) {
            return Err(AppError::Validation(format!(
                "Appointment code must start with {}",
                APPOINTMENT_CODE_PREFIX
            )));
        }

        debug!("Fetching appointment by code: {}", code);

        let path = format!("/api/appointments/code/{}", path_segment(&code));
        self.client.get_data(&path, &[]).await
    }
}
